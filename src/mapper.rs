//! Pure mapping from parsed results to summaries and insertion plans.
//!
//! `plan_grouped`/`plan_ungrouped` assign the 1-based suite and case indices
//! ahead of persistence, so the index invariants are enforced (and testable)
//! in one place. Every repository implementation consumes the same plan.

use chrono::Utc;

use crate::models::{
    GroupedResults, ParsedTestCase, ParsedTestFailure, ParsedTestSuite, PublicId, TestRunSummary,
};

/// Split a dotted suite name into package and class parts.
///
/// "com.example.MyTest" -> (Some("com.example"), "MyTest"); "MyTest" -> (None, "MyTest").
pub fn parse_package_and_class_name(name: &str) -> (Option<String>, String) {
    match name.rsplit_once('.') {
        Some((package, class)) if !package.is_empty() => {
            (Some(package.to_string()), class.to_string())
        }
        _ => (None, name.to_string()),
    }
}

fn case_duration(test_case: &ParsedTestCase) -> f64 {
    test_case.duration.unwrap_or(0.0)
}

fn suite_duration(suite: &ParsedTestSuite) -> f64 {
    suite
        .duration
        .unwrap_or_else(|| suite.test_cases.iter().map(case_duration).sum())
}

/// Compute the aggregate summary over all suites and cases of a run.
pub fn to_test_run_summary(public_id: &PublicId, test_suites: &[ParsedTestSuite]) -> TestRunSummary {
    let mut total = 0;
    let mut passing = 0;
    let mut skipped = 0;
    let mut failures = 0;
    let mut slowest: f64 = 0.0;

    for suite in test_suites {
        for test_case in &suite.test_cases {
            total += 1;
            if test_case.skipped {
                skipped += 1;
            } else if test_case.passed {
                passing += 1;
            } else {
                failures += 1;
            }
            slowest = slowest.max(case_duration(test_case));
        }
    }

    let cumulative: f64 = test_suites.iter().map(suite_duration).sum();
    let average = if total > 0 {
        cumulative / f64::from(total)
    } else {
        0.0
    };

    TestRunSummary {
        id: public_id.to_string(),
        total_test_count: total,
        total_passing_count: passing,
        total_skipped_count: skipped,
        total_failure_count: failures,
        passed: failures == 0,
        cumulative_duration: cumulative,
        average_duration: average,
        slowest_test_case_duration: slowest,
        created_timestamp: Utc::now(),
    }
}

/// Group identity carried through to the `test_suite_groups` row.
#[derive(Debug, Clone)]
pub struct GroupMeta {
    pub group_name: String,
    pub group_label: Option<String>,
}

/// Fully indexed insertion plan for one test run.
#[derive(Debug, Clone)]
pub struct TestRunPlan {
    pub summary: TestRunSummary,
    pub groups: Vec<GroupPlan>,
}

/// One group's slice of the plan; `meta` is `None` for ungrouped saves.
#[derive(Debug, Clone)]
pub struct GroupPlan {
    pub meta: Option<GroupMeta>,
    pub suites: Vec<SuitePlan>,
}

/// One suite row with its globally contiguous index and per-suite counts.
#[derive(Debug, Clone)]
pub struct SuitePlan {
    pub idx: i32,
    pub package_name: Option<String>,
    pub class_name: String,
    pub test_count: i32,
    pub passing_count: i32,
    pub skipped_count: i32,
    pub failure_count: i32,
    pub duration: f64,
    pub start_ts: Option<chrono::DateTime<Utc>>,
    pub hostname: Option<String>,
    pub system_out: Option<String>,
    pub system_err: Option<String>,
    pub cases: Vec<CasePlan>,
}

/// One case row with its index within the suite.
#[derive(Debug, Clone)]
pub struct CasePlan {
    pub idx: i32,
    pub name: String,
    pub class_name: Option<String>,
    pub duration: f64,
    pub passed: bool,
    pub skipped: bool,
    pub failure: Option<ParsedTestFailure>,
}

impl TestRunPlan {
    /// All suites across groups, in index order.
    pub fn suites(&self) -> impl Iterator<Item = &SuitePlan> {
        self.groups.iter().flat_map(|g| g.suites.iter())
    }
}

/// Plan an ungrouped save: one anonymous group holding every suite.
pub fn plan_ungrouped(public_id: &PublicId, test_suites: Vec<ParsedTestSuite>) -> TestRunPlan {
    plan(public_id, vec![(None, test_suites)])
}

/// Plan a grouped save: groups are processed in their given order so suite
/// indices stay globally contiguous across groups.
pub fn plan_grouped(public_id: &PublicId, grouped_results: &GroupedResults) -> TestRunPlan {
    let groups = grouped_results
        .grouped_test_suites
        .iter()
        .map(|g| {
            (
                Some(GroupMeta {
                    group_name: g.group_name.clone(),
                    group_label: g.group_label.clone(),
                }),
                g.test_suites.clone(),
            )
        })
        .collect();
    plan(public_id, groups)
}

fn plan(public_id: &PublicId, groups: Vec<(Option<GroupMeta>, Vec<ParsedTestSuite>)>) -> TestRunPlan {
    let all_suites: Vec<ParsedTestSuite> = groups
        .iter()
        .flat_map(|(_, suites)| suites.iter().cloned())
        .collect();
    let summary = to_test_run_summary(public_id, &all_suites);

    let mut suite_starting_index = 0;
    let groups = groups
        .into_iter()
        .map(|(meta, suites)| {
            let suite_count = suites.len() as i32;
            let group = GroupPlan {
                meta,
                suites: suites
                    .into_iter()
                    .enumerate()
                    .map(|(suite_idx, suite)| {
                        plan_suite(suite, suite_starting_index + suite_idx as i32 + 1)
                    })
                    .collect(),
            };
            suite_starting_index += suite_count;
            group
        })
        .collect();

    TestRunPlan { summary, groups }
}

fn plan_suite(suite: ParsedTestSuite, idx: i32) -> SuitePlan {
    let (package_name, class_name) = parse_package_and_class_name(&suite.name);
    let duration = suite_duration(&suite);

    let mut test_count = 0;
    let mut passing_count = 0;
    let mut skipped_count = 0;
    let mut failure_count = 0;

    let cases = suite
        .test_cases
        .into_iter()
        .enumerate()
        .map(|(case_idx, test_case)| {
            test_count += 1;
            if test_case.skipped {
                skipped_count += 1;
            } else if test_case.passed {
                passing_count += 1;
            } else {
                failure_count += 1;
            }
            CasePlan {
                idx: case_idx as i32 + 1,
                duration: case_duration(&test_case),
                name: test_case.name,
                class_name: test_case.class_name,
                passed: test_case.passed,
                skipped: test_case.skipped,
                failure: test_case.failure,
            }
        })
        .collect();

    SuitePlan {
        idx,
        package_name,
        class_name,
        test_count,
        passing_count,
        skipped_count,
        failure_count,
        duration,
        start_ts: suite.start_ts,
        hostname: suite.hostname,
        system_out: suite.system_out,
        system_err: suite.system_err,
        cases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupedTestSuites;

    fn case(name: &str, passed: bool, skipped: bool, duration: f64) -> ParsedTestCase {
        ParsedTestCase {
            name: name.to_string(),
            class_name: None,
            duration: Some(duration),
            passed,
            skipped,
            failure: if !passed && !skipped {
                Some(ParsedTestFailure {
                    failure_message: Some(format!("{name} failure message")),
                    failure_type: None,
                    failure_text: None,
                })
            } else {
                None
            },
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

    #[test]
    fn parses_package_and_class_name() {
        assert_eq!(
            parse_package_and_class_name("com.example.MyTest"),
            (Some("com.example".to_string()), "MyTest".to_string())
        );
        assert_eq!(
            parse_package_and_class_name("MyTest"),
            (None, "MyTest".to_string())
        );
        assert_eq!(
            parse_package_and_class_name(".MyTest"),
            (None, ".MyTest".to_string())
        );
    }

    #[test]
    fn summary_counts_equal_the_input_tally() {
        let suites = vec![
            suite(
                "a.SuiteOne",
                vec![
                    case("t1", true, false, 1.0),
                    case("t2", false, false, 2.0),
                    case("t3", false, true, 0.0),
                ],
            ),
            suite("b.SuiteTwo", vec![case("t4", true, false, 5.0)]),
        ];

        let summary = to_test_run_summary(&PublicId::new("ABC123456789"), &suites);
        assert_eq!(summary.total_test_count, 4);
        assert_eq!(summary.total_passing_count, 2);
        assert_eq!(summary.total_failure_count, 1);
        assert_eq!(summary.total_skipped_count, 1);
        assert!(!summary.passed);
        assert_eq!(summary.cumulative_duration, 8.0);
        assert_eq!(summary.average_duration, 2.0);
        assert_eq!(summary.slowest_test_case_duration, 5.0);
    }

    #[test]
    fn summary_of_empty_run_is_all_zero_and_passed() {
        let summary = to_test_run_summary(&PublicId::new("ABC123456789"), &[]);
        assert_eq!(summary.total_test_count, 0);
        assert_eq!(summary.average_duration, 0.0);
        assert!(summary.passed);
    }

    #[test]
    fn suite_duration_falls_back_to_case_sum() {
        let mut s = suite("S", vec![case("t1", true, false, 1.5), case("t2", true, false, 2.5)]);
        let summary = to_test_run_summary(&PublicId::new("X"), std::slice::from_ref(&s));
        assert_eq!(summary.cumulative_duration, 4.0);

        s.duration = Some(10.0);
        let summary = to_test_run_summary(&PublicId::new("X"), &[s]);
        assert_eq!(summary.cumulative_duration, 10.0);
    }

    #[test]
    fn grouped_plan_assigns_globally_contiguous_suite_indices() {
        let grouped = GroupedResults {
            grouped_test_suites: vec![
                GroupedTestSuites {
                    group_name: "unit".to_string(),
                    group_label: None,
                    test_suites: vec![
                        suite("UnitOne", vec![case("t", true, false, 0.1)]),
                        suite("UnitTwo", vec![case("t", true, false, 0.1)]),
                    ],
                },
                GroupedTestSuites {
                    group_name: "integration".to_string(),
                    group_label: None,
                    test_suites: vec![suite("IntegrationOne", vec![case("t", true, false, 0.1)])],
                },
            ],
            metadata: None,
        };

        let plan = plan_grouped(&PublicId::generate(), &grouped);
        let indices: Vec<i32> = plan.suites().map(|s| s.idx).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        assert_eq!(
            plan.groups[0].meta.as_ref().map(|m| m.group_name.as_str()),
            Some("unit")
        );
        assert_eq!(plan.groups[0].suites.len(), 2);
        assert_eq!(plan.groups[1].suites[0].idx, 3);
    }

    #[test]
    fn case_indices_are_contiguous_within_each_suite() {
        let plan = plan_ungrouped(
            &PublicId::generate(),
            vec![suite(
                "S",
                vec![
                    case("t1", true, false, 0.1),
                    case("t2", false, false, 0.2),
                    case("t3", true, false, 0.3),
                ],
            )],
        );

        let suite_plan = plan.suites().next().unwrap();
        let indices: Vec<i32> = suite_plan.cases.iter().map(|c| c.idx).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn per_suite_counts_match_their_cases() {
        let plan = plan_ungrouped(
            &PublicId::generate(),
            vec![suite(
                "S",
                vec![
                    case("t1", true, false, 0.1),
                    case("t2", false, false, 0.2),
                    case("t3", false, true, 0.0),
                ],
            )],
        );

        let suite_plan = plan.suites().next().unwrap();
        assert_eq!(suite_plan.test_count, 3);
        assert_eq!(suite_plan.passing_count, 1);
        assert_eq!(suite_plan.failure_count, 1);
        assert_eq!(suite_plan.skipped_count, 1);
    }

    #[test]
    fn failures_are_carried_only_for_failing_cases() {
        let plan = plan_ungrouped(
            &PublicId::generate(),
            vec![suite(
                "S",
                vec![case("ok", true, false, 0.1), case("bad", false, false, 0.2)],
            )],
        );

        let suite_plan = plan.suites().next().unwrap();
        assert!(suite_plan.cases[0].failure.is_none());
        assert!(suite_plan.cases[1].failure.is_some());
    }
}
