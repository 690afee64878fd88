//! Integration tests for the test run repository contract.
//!
//! Runs the `TestRunRepository` trait against an in-memory implementation
//! built on the same insertion plans the database path uses, so the
//! index/count/atomicity contract is exercised without a live Postgres.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use testrun_server::error::{AppError, AppResult};
use testrun_server::mapper::{self, TestRunPlan};
use testrun_server::models::{
    GroupedResults, GroupedTestSuites, ParsedTestCase, ParsedTestFailure, ParsedTestSuite,
    PublicId, TestCase, TestFailure, TestRun, TestRunSummary, TestSuite,
};

use testrun_server::db::TestRunRepository;

/// In-memory repository keyed by public ID.
#[derive(Default)]
struct InMemoryTestRunRepository {
    runs: Mutex<HashMap<String, TestRun>>,
}

impl InMemoryTestRunRepository {
    fn store(&self, public_id: &PublicId, plan: TestRunPlan) -> AppResult<TestRunSummary> {
        let mut runs = self
            .runs
            .lock()
            .map_err(|_| AppError::Database("lock poisoned".to_string()))?;
        if runs.contains_key(public_id.as_str()) {
            return Err(AppError::Conflict(format!(
                "test run {public_id} already exists"
            )));
        }

        let run = materialize(public_id, &plan);
        let summary = plan.summary;
        runs.insert(public_id.to_string(), run);
        Ok(summary)
    }
}

/// Build the run tree a fetch would return, from the insertion plan.
fn materialize(public_id: &PublicId, plan: &TestRunPlan) -> TestRun {
    let test_suites = plan
        .groups
        .iter()
        .flat_map(|group| {
            group.suites.iter().map(|suite| TestSuite {
                idx: suite.idx,
                package_name: suite.package_name.clone(),
                class_name: suite.class_name.clone(),
                test_count: suite.test_count,
                passing_count: suite.passing_count,
                skipped_count: suite.skipped_count,
                failure_count: suite.failure_count,
                duration: suite.duration,
                start_ts: suite.start_ts,
                hostname: suite.hostname.clone(),
                group_name: group.meta.as_ref().map(|m| m.group_name.clone()),
                group_label: group.meta.as_ref().and_then(|m| m.group_label.clone()),
                test_cases: suite
                    .cases
                    .iter()
                    .map(|c| TestCase {
                        idx: c.idx,
                        name: c.name.clone(),
                        class_name: c.class_name.clone(),
                        duration: c.duration,
                        passed: c.passed,
                        skipped: c.skipped,
                        failure: c.failure.as_ref().map(|f| TestFailure {
                            failure_message: f.failure_message.clone(),
                            failure_type: f.failure_type.clone(),
                            failure_text: f.failure_text.clone(),
                        }),
                    })
                    .collect(),
            })
        })
        .collect();

    TestRun {
        id: public_id.to_string(),
        summary: plan.summary.clone(),
        test_suites,
    }
}

#[async_trait]
impl TestRunRepository for InMemoryTestRunRepository {
    async fn save_test_run(
        &self,
        public_id: &PublicId,
        test_suites: Vec<ParsedTestSuite>,
    ) -> AppResult<TestRunSummary> {
        self.store(public_id, mapper::plan_ungrouped(public_id, test_suites))
    }

    async fn save_grouped_test_run(
        &self,
        public_id: &PublicId,
        grouped_results: GroupedResults,
    ) -> AppResult<TestRunSummary> {
        self.store(public_id, mapper::plan_grouped(public_id, &grouped_results))
    }

    async fn fetch_test_run(&self, public_id: &PublicId) -> AppResult<Option<TestRun>> {
        let runs = self
            .runs
            .lock()
            .map_err(|_| AppError::Database("lock poisoned".to_string()))?;
        Ok(runs.get(public_id.as_str()).cloned())
    }

    async fn fetch_test_run_summary(
        &self,
        public_id: &PublicId,
    ) -> AppResult<Option<TestRunSummary>> {
        let runs = self
            .runs
            .lock()
            .map_err(|_| AppError::Database("lock poisoned".to_string()))?;
        Ok(runs.get(public_id.as_str()).map(|r| r.summary.clone()))
    }
}

fn passing_case(name: &str, duration: f64) -> ParsedTestCase {
    ParsedTestCase {
        name: name.to_string(),
        class_name: None,
        duration: Some(duration),
        passed: true,
        skipped: false,
        failure: None,
    }
}

fn failing_case(name: &str, message: &str) -> ParsedTestCase {
    ParsedTestCase {
        name: name.to_string(),
        class_name: None,
        duration: Some(0.5),
        passed: false,
        skipped: false,
        failure: Some(ParsedTestFailure {
            failure_message: Some(message.to_string()),
            failure_type: Some("AssertionError".to_string()),
            failure_text: None,
        }),
    }
}

fn suite(name: &str, cases: Vec<ParsedTestCase>) -> ParsedTestSuite {
    ParsedTestSuite {
        name: name.to_string(),
        duration: None,
        start_ts: None,
        hostname: None,
        system_out: None,
        system_err: None,
        test_cases: cases,
    }
}

#[tokio::test]
async fn single_passing_suite_round_trips() {
    let repo = InMemoryTestRunRepository::default();
    let public_id = PublicId::generate();

    let summary = repo
        .save_test_run(
            &public_id,
            vec![suite("testSuite1", vec![passing_case("testSuite1TestCase1", 1.0)])],
        )
        .await
        .unwrap();

    assert_eq!(summary.id, public_id.to_string());
    assert_eq!(summary.total_test_count, 1);
    assert_eq!(summary.total_passing_count, 1);
    assert_eq!(summary.total_skipped_count, 0);
    assert_eq!(summary.total_failure_count, 0);
    assert!(summary.passed);

    let run = repo.fetch_test_run(&public_id).await.unwrap().unwrap();
    assert_eq!(run.test_suites.len(), 1);
    let s = &run.test_suites[0];
    assert_eq!(s.idx, 1);
    assert_eq!(s.class_name, "testSuite1");
    assert_eq!(s.test_cases.len(), 1);
    let c = &s.test_cases[0];
    assert_eq!(c.idx, 1);
    assert_eq!(c.name, "testSuite1TestCase1");
    assert!(c.passed);
    assert!(c.failure.is_none());
}

#[tokio::test]
async fn grouped_save_keeps_suite_indices_contiguous_across_groups() {
    let repo = InMemoryTestRunRepository::default();
    let public_id = PublicId::generate();

    let grouped = GroupedResults {
        grouped_test_suites: vec![
            GroupedTestSuites {
                group_name: "unit".to_string(),
                group_label: Some("Unit tests".to_string()),
                test_suites: vec![
                    suite("a.UnitOne", vec![passing_case("t", 0.1)]),
                    suite("a.UnitTwo", vec![passing_case("t", 0.1)]),
                ],
            },
            GroupedTestSuites {
                group_name: "integration".to_string(),
                group_label: None,
                test_suites: vec![suite("a.IntegrationOne", vec![passing_case("t", 0.1)])],
            },
        ],
        metadata: None,
    };

    repo.save_grouped_test_run(&public_id, grouped).await.unwrap();

    let run = repo.fetch_test_run(&public_id).await.unwrap().unwrap();
    let indices: Vec<i32> = run.test_suites.iter().map(|s| s.idx).collect();
    assert_eq!(indices, vec![1, 2, 3]);

    assert_eq!(run.test_suites[0].group_name.as_deref(), Some("unit"));
    assert_eq!(run.test_suites[1].group_name.as_deref(), Some("unit"));
    assert_eq!(
        run.test_suites[2].group_name.as_deref(),
        Some("integration")
    );
    assert_eq!(
        run.test_suites[0].group_label.as_deref(),
        Some("Unit tests")
    );
}

#[tokio::test]
async fn failing_case_carries_its_failure_detail() {
    let repo = InMemoryTestRunRepository::default();
    let public_id = PublicId::generate();

    let summary = repo
        .save_test_run(
            &public_id,
            vec![suite(
                "com.example.MyTest",
                vec![
                    passing_case("works", 0.2),
                    failing_case("breaks", "expected 1 but was 2"),
                ],
            )],
        )
        .await
        .unwrap();

    assert_eq!(summary.total_failure_count, 1);
    assert!(!summary.passed);

    let run = repo.fetch_test_run(&public_id).await.unwrap().unwrap();
    let s = &run.test_suites[0];
    assert_eq!(s.package_name.as_deref(), Some("com.example"));
    assert_eq!(s.class_name, "MyTest");
    assert_eq!(s.failure_count, 1);

    let failure = s.test_cases[1].failure.as_ref().unwrap();
    assert_eq!(
        failure.failure_message.as_deref(),
        Some("expected 1 but was 2")
    );
    assert_eq!(failure.failure_type.as_deref(), Some("AssertionError"));
    assert!(s.test_cases[0].failure.is_none());
}

#[tokio::test]
async fn summary_counts_partition_the_cases() {
    let repo = InMemoryTestRunRepository::default();
    let public_id = PublicId::generate();

    let mut skipped = passing_case("skipped", 0.0);
    skipped.passed = false;
    skipped.skipped = true;

    let summary = repo
        .save_test_run(
            &public_id,
            vec![suite(
                "S",
                vec![
                    passing_case("p1", 1.0),
                    passing_case("p2", 2.0),
                    failing_case("f1", "boom"),
                    skipped,
                ],
            )],
        )
        .await
        .unwrap();

    assert_eq!(summary.total_test_count, 4);
    assert_eq!(
        summary.total_passing_count + summary.total_skipped_count + summary.total_failure_count,
        summary.total_test_count
    );
    assert_eq!(summary.total_passing_count, 2);
    assert_eq!(summary.total_skipped_count, 1);
    assert_eq!(summary.total_failure_count, 1);
}

#[tokio::test]
async fn fetch_of_unknown_id_returns_none() {
    let repo = InMemoryTestRunRepository::default();
    let unknown = PublicId::generate();

    assert!(repo.fetch_test_run(&unknown).await.unwrap().is_none());
    assert!(
        repo.fetch_test_run_summary(&unknown)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_public_id_is_a_conflict() {
    let repo = InMemoryTestRunRepository::default();
    let public_id = PublicId::generate();

    repo.save_test_run(&public_id, vec![suite("S", vec![passing_case("t", 0.1)])])
        .await
        .unwrap();

    let err = repo
        .save_test_run(&public_id, vec![suite("S", vec![passing_case("t", 0.1)])])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn empty_run_persists_with_zero_counts() {
    let repo = InMemoryTestRunRepository::default();
    let public_id = PublicId::generate();

    let summary = repo.save_test_run(&public_id, vec![]).await.unwrap();
    assert_eq!(summary.total_test_count, 0);
    assert_eq!(summary.average_duration, 0.0);
    assert!(summary.passed);

    let run = repo.fetch_test_run(&public_id).await.unwrap().unwrap();
    assert!(run.test_suites.is_empty());
}

#[tokio::test]
async fn summary_fetch_matches_save_result() {
    let repo = InMemoryTestRunRepository::default();
    let public_id = PublicId::generate();

    let saved = repo
        .save_test_run(
            &public_id,
            vec![suite("S", vec![passing_case("t1", 1.0), passing_case("t2", 3.0)])],
        )
        .await
        .unwrap();

    let fetched = repo
        .fetch_test_run_summary(&public_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.total_test_count, saved.total_test_count);
    assert_eq!(fetched.cumulative_duration, 4.0);
    assert_eq!(fetched.average_duration, 2.0);
    assert_eq!(fetched.slowest_test_case_duration, 3.0);
}
