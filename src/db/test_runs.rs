//! Test run persistence: save parsed results, read runs back by public ID.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, DatabaseTransaction, EntityTrait,
    FromQueryResult, QueryFilter, Set, Statement, TransactionTrait,
};
use tracing::info;

use crate::entity::test_case::ActiveModel as TestCaseActiveModel;
use crate::entity::test_failure::ActiveModel as TestFailureActiveModel;
use crate::entity::test_run::{
    self, ActiveModel as TestRunActiveModel, Entity as TestRunEntity, Model as TestRunModel,
};
use crate::entity::test_suite::{
    self, ActiveModel as TestSuiteActiveModel, Entity as TestSuiteEntity,
};
use crate::entity::test_suite_group::ActiveModel as TestSuiteGroupActiveModel;
use crate::entity::git_metadata::ActiveModel as GitMetadataActiveModel;
use crate::error::AppResult;
use crate::mapper::{self, SuitePlan, TestRunPlan};
use crate::models::{
    GitMetadata, GroupedResults, ParsedTestSuite, PublicId, TestCase, TestFailure, TestRun,
    TestRunSummary, TestSuite,
};

use super::DbPool;

/// Persistence facade for test runs.
///
/// Injected into handlers so unit tests can substitute an in-memory fake.
#[async_trait]
pub trait TestRunRepository: Send + Sync {
    /// Persist an ungrouped run atomically and return its computed summary.
    async fn save_test_run(
        &self,
        public_id: &PublicId,
        test_suites: Vec<ParsedTestSuite>,
    ) -> AppResult<TestRunSummary>;

    /// Persist a grouped run atomically, keeping suite indices globally
    /// contiguous across groups, and return its computed summary.
    async fn save_grouped_test_run(
        &self,
        public_id: &PublicId,
        grouped_results: GroupedResults,
    ) -> AppResult<TestRunSummary>;

    /// Reconstruct the full run tree, or `None` if no run matches.
    async fn fetch_test_run(&self, public_id: &PublicId) -> AppResult<Option<TestRun>>;

    /// Read only the aggregate summary row, or `None` if absent.
    async fn fetch_test_run_summary(
        &self,
        public_id: &PublicId,
    ) -> AppResult<Option<TestRunSummary>>;
}

#[async_trait]
impl TestRunRepository for DbPool {
    async fn save_test_run(
        &self,
        public_id: &PublicId,
        test_suites: Vec<ParsedTestSuite>,
    ) -> AppResult<TestRunSummary> {
        let plan = mapper::plan_ungrouped(public_id, test_suites);
        self.save_plan(public_id, &plan, None).await?;
        Ok(plan.summary)
    }

    async fn save_grouped_test_run(
        &self,
        public_id: &PublicId,
        grouped_results: GroupedResults,
    ) -> AppResult<TestRunSummary> {
        let plan = mapper::plan_grouped(public_id, &grouped_results);
        let git = grouped_results.metadata.and_then(|m| m.git);
        self.save_plan(public_id, &plan, git).await?;
        Ok(plan.summary)
    }

    async fn fetch_test_run(&self, public_id: &PublicId) -> AppResult<Option<TestRun>> {
        let rows = TestRunJoinRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            FETCH_TEST_RUN_SQL,
            [public_id.as_str().into()],
        ))
        .all(self.connection())
        .await?;

        Ok(assemble_test_run(rows))
    }

    async fn fetch_test_run_summary(
        &self,
        public_id: &PublicId,
    ) -> AppResult<Option<TestRunSummary>> {
        let run = TestRunEntity::find()
            .filter(test_run::Column::PublicId.eq(public_id.as_str()))
            .one(self.connection())
            .await?;

        Ok(run.map(to_summary))
    }
}

impl DbPool {
    /// Insert the whole run tree in one transaction: run row first, then
    /// group rows before their member suites, suites/cases/failures in
    /// traversal order. Either everything becomes visible or nothing does.
    async fn save_plan(
        &self,
        public_id: &PublicId,
        plan: &TestRunPlan,
        git: Option<GitMetadata>,
    ) -> AppResult<()> {
        let txn = self.connection().begin().await?;

        let summary = &plan.summary;
        let run = TestRunActiveModel {
            public_id: Set(public_id.to_string()),
            total_test_count: Set(summary.total_test_count),
            total_passing_count: Set(summary.total_passing_count),
            total_skipped_count: Set(summary.total_skipped_count),
            total_failure_count: Set(summary.total_failure_count),
            passed: Set(summary.passed),
            cumulative_duration: Set(summary.cumulative_duration),
            average_duration: Set(summary.average_duration),
            slowest_test_case_duration: Set(summary.slowest_test_case_duration),
            created_timestamp: Set(summary.created_timestamp),
            ..Default::default()
        };
        let run = run.insert(&txn).await?;

        info!("Inserted test run {}", public_id);

        for group in &plan.groups {
            let group_id = match &group.meta {
                Some(meta) => {
                    let group_row = TestSuiteGroupActiveModel {
                        test_run_id: Set(run.id),
                        group_name: Set(meta.group_name.clone()),
                        group_label: Set(meta.group_label.clone()),
                        ..Default::default()
                    };
                    Some(group_row.insert(&txn).await?.id)
                }
                None => None,
            };

            save_test_suites(&txn, run.id, group_id, &group.suites).await?;
        }

        if let Some(git) = git {
            let metadata = GitMetadataActiveModel {
                test_run_id: Set(run.id),
                repo_name: Set(git.repo_name),
                project_name: Set(git.project_name),
                branch_name: Set(git.branch_name),
                is_main_line: Set(git.is_main_line),
                ..Default::default()
            };
            metadata.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Fetch one suite of a run by its index (for system-out/err reads).
    pub async fn fetch_test_suite(
        &self,
        public_id: &PublicId,
        suite_idx: i32,
    ) -> AppResult<Option<test_suite::Model>> {
        let Some(run) = TestRunEntity::find()
            .filter(test_run::Column::PublicId.eq(public_id.as_str()))
            .one(self.connection())
            .await?
        else {
            return Ok(None);
        };

        let suite = TestSuiteEntity::find()
            .filter(test_suite::Column::TestRunId.eq(run.id))
            .filter(test_suite::Column::Idx.eq(suite_idx))
            .one(self.connection())
            .await?;

        Ok(suite)
    }
}

async fn save_test_suites(
    txn: &DatabaseTransaction,
    test_run_id: i64,
    test_suite_group_id: Option<i64>,
    suites: &[SuitePlan],
) -> AppResult<()> {
    for suite in suites {
        let suite_row = TestSuiteActiveModel {
            test_run_id: Set(test_run_id),
            test_suite_group_id: Set(test_suite_group_id),
            idx: Set(suite.idx),
            package_name: Set(suite.package_name.clone()),
            class_name: Set(suite.class_name.clone()),
            test_count: Set(suite.test_count),
            passing_count: Set(suite.passing_count),
            skipped_count: Set(suite.skipped_count),
            failure_count: Set(suite.failure_count),
            duration: Set(suite.duration),
            start_ts: Set(suite.start_ts),
            hostname: Set(suite.hostname.clone()),
            system_out: Set(suite.system_out.clone()),
            system_err: Set(suite.system_err.clone()),
            ..Default::default()
        };
        let suite_row = suite_row.insert(txn).await?;

        for test_case in &suite.cases {
            let case_row = TestCaseActiveModel {
                test_suite_id: Set(suite_row.id),
                idx: Set(test_case.idx),
                name: Set(test_case.name.clone()),
                class_name: Set(test_case.class_name.clone()),
                duration: Set(test_case.duration),
                passed: Set(test_case.passed),
                skipped: Set(test_case.skipped),
                ..Default::default()
            };
            let case_row = case_row.insert(txn).await?;

            if let Some(failure) = &test_case.failure {
                let failure_row = TestFailureActiveModel {
                    test_case_id: Set(case_row.id),
                    failure_message: Set(failure.failure_message.clone()),
                    failure_type: Set(failure.failure_type.clone()),
                    failure_text: Set(failure.failure_text.clone()),
                    ..Default::default()
                };
                failure_row.insert(txn).await?;
            }
        }
    }

    Ok(())
}

fn to_summary(run: TestRunModel) -> TestRunSummary {
    TestRunSummary {
        id: run.public_id,
        total_test_count: run.total_test_count,
        total_passing_count: run.total_passing_count,
        total_skipped_count: run.total_skipped_count,
        total_failure_count: run.total_failure_count,
        passed: run.passed,
        cumulative_duration: run.cumulative_duration,
        average_duration: run.average_duration,
        slowest_test_case_duration: run.slowest_test_case_duration,
        created_timestamp: run.created_timestamp,
    }
}

/// One row of the multi-table outer join used by `fetch_test_run`.
///
/// Suite, case, failure, and group columns are all nullable: a run can have
/// suites without a group, suites without cases, and cases without failures.
#[derive(Debug, FromQueryResult)]
struct TestRunJoinRow {
    // run
    public_id: String,
    total_test_count: i32,
    total_passing_count: i32,
    total_skipped_count: i32,
    total_failure_count: i32,
    passed: bool,
    cumulative_duration: f64,
    average_duration: f64,
    slowest_test_case_duration: f64,
    created_timestamp: DateTime<Utc>,
    // suite
    suite_idx: Option<i32>,
    suite_package_name: Option<String>,
    suite_class_name: Option<String>,
    suite_test_count: Option<i32>,
    suite_passing_count: Option<i32>,
    suite_skipped_count: Option<i32>,
    suite_failure_count: Option<i32>,
    suite_duration: Option<f64>,
    suite_start_ts: Option<DateTime<Utc>>,
    suite_hostname: Option<String>,
    // group
    group_name: Option<String>,
    group_label: Option<String>,
    // case
    case_idx: Option<i32>,
    case_name: Option<String>,
    case_class_name: Option<String>,
    case_duration: Option<f64>,
    case_passed: Option<bool>,
    case_skipped: Option<bool>,
    // failure
    failure_id: Option<i64>,
    failure_message: Option<String>,
    failure_type: Option<String>,
    failure_text: Option<String>,
}

const FETCH_TEST_RUN_SQL: &str = r#"
SELECT
    tr.public_id,
    tr.total_test_count,
    tr.total_passing_count,
    tr.total_skipped_count,
    tr.total_failure_count,
    tr.passed,
    tr.cumulative_duration,
    tr.average_duration,
    tr.slowest_test_case_duration,
    tr.created_timestamp,
    ts.idx AS suite_idx,
    ts.package_name AS suite_package_name,
    ts.class_name AS suite_class_name,
    ts.test_count AS suite_test_count,
    ts.passing_count AS suite_passing_count,
    ts.skipped_count AS suite_skipped_count,
    ts.failure_count AS suite_failure_count,
    ts.duration AS suite_duration,
    ts.start_ts AS suite_start_ts,
    ts.hostname AS suite_hostname,
    tsg.group_name,
    tsg.group_label,
    tc.idx AS case_idx,
    tc.name AS case_name,
    tc.class_name AS case_class_name,
    tc.duration AS case_duration,
    tc.passed AS case_passed,
    tc.skipped AS case_skipped,
    tf.id AS failure_id,
    tf.failure_message,
    tf.failure_type,
    tf.failure_text
FROM test_runs tr
LEFT OUTER JOIN test_suites ts ON ts.test_run_id = tr.id
LEFT OUTER JOIN test_suite_groups tsg ON tsg.id = ts.test_suite_group_id
LEFT OUTER JOIN test_cases tc ON tc.test_suite_id = ts.id
LEFT OUTER JOIN test_failures tf ON tf.test_case_id = tc.id
WHERE tr.public_id = $1
ORDER BY ts.idx ASC, tc.idx ASC
"#;

/// Fold the join rows back into the run tree.
fn assemble_test_run(rows: Vec<TestRunJoinRow>) -> Option<TestRun> {
    let first = rows.first()?;

    let summary = TestRunSummary {
        id: first.public_id.clone(),
        total_test_count: first.total_test_count,
        total_passing_count: first.total_passing_count,
        total_skipped_count: first.total_skipped_count,
        total_failure_count: first.total_failure_count,
        passed: first.passed,
        cumulative_duration: first.cumulative_duration,
        average_duration: first.average_duration,
        slowest_test_case_duration: first.slowest_test_case_duration,
        created_timestamp: first.created_timestamp,
    };
    let id = first.public_id.clone();

    let mut test_suites: Vec<TestSuite> = Vec::new();
    for row in rows {
        let Some(suite_idx) = row.suite_idx else {
            continue; // run without any suites
        };

        if test_suites.last().map(|s| s.idx) != Some(suite_idx) {
            test_suites.push(TestSuite {
                idx: suite_idx,
                package_name: row.suite_package_name,
                class_name: row.suite_class_name.unwrap_or_default(),
                test_count: row.suite_test_count.unwrap_or(0),
                passing_count: row.suite_passing_count.unwrap_or(0),
                skipped_count: row.suite_skipped_count.unwrap_or(0),
                failure_count: row.suite_failure_count.unwrap_or(0),
                duration: row.suite_duration.unwrap_or(0.0),
                start_ts: row.suite_start_ts,
                hostname: row.suite_hostname,
                group_name: row.group_name,
                group_label: row.group_label,
                test_cases: Vec::new(),
            });
        }

        let Some(case_idx) = row.case_idx else {
            continue; // suite without any cases
        };

        let failure = row.failure_id.map(|_| TestFailure {
            failure_message: row.failure_message,
            failure_type: row.failure_type,
            failure_text: row.failure_text,
        });

        if let Some(suite) = test_suites.last_mut() {
            suite.test_cases.push(TestCase {
                idx: case_idx,
                name: row.case_name.unwrap_or_default(),
                class_name: row.case_class_name,
                duration: row.case_duration.unwrap_or(0.0),
                passed: row.case_passed.unwrap_or(false),
                skipped: row.case_skipped.unwrap_or(false),
                failure,
            });
        }
    }

    Some(TestRun {
        id,
        summary,
        test_suites,
    })
}
