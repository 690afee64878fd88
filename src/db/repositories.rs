//! Repository-level aggregate queries: timelines, flaky tests, coverage.
//!
//! All reads join through git_metadata and only consider mainline runs.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseBackend, FromQueryResult, Statement, Value};

use crate::error::AppResult;
use crate::models::{
    FlakyTest, RepositoryCoverageTimelineEntry, RepositoryPerformanceTimelineEntry,
    RepositoryTimelineEntry,
};

use super::DbPool;

/// Query bounds for flaky-test detection.
#[derive(Debug, Clone, Copy)]
pub struct FlakyTestsParams {
    /// Minimum number of distinct failing runs for a case to count as flaky.
    pub failure_threshold: i64,
    /// How many of the most recent runs to consider.
    pub max_runs: i64,
}

impl Default for FlakyTestsParams {
    fn default() -> Self {
        FlakyTestsParams {
            failure_threshold: 2,
            max_runs: 50,
        }
    }
}

fn repo_values(repo_name: &str, project_name: Option<&str>) -> [Value; 2] {
    [
        repo_name.into(),
        project_name.map(|s| s.to_string()).into(),
    ]
}

const TIMELINE_SQL: &str = r#"
SELECT
    tr.public_id,
    tr.created_timestamp,
    tr.total_test_count,
    tr.total_failure_count,
    tr.passed,
    tr.cumulative_duration,
    tr.average_duration
FROM test_runs tr
INNER JOIN git_metadata gm ON gm.test_run_id = tr.id
WHERE gm.repo_name = $1
  AND (($2::VARCHAR IS NULL AND gm.project_name IS NULL) OR gm.project_name = $2::VARCHAR)
  AND gm.is_main_line
ORDER BY tr.created_timestamp ASC
"#;

const COVERAGE_TIMELINE_SQL: &str = r#"
SELECT
    tr.public_id,
    tr.created_timestamp,
    cs.covered_percentage,
    cs.covered_lines,
    cs.total_lines
FROM coverage_stats cs
INNER JOIN test_runs tr ON tr.id = cs.test_run_id
INNER JOIN git_metadata gm ON gm.test_run_id = tr.id
WHERE gm.repo_name = $1
  AND (($2::VARCHAR IS NULL AND gm.project_name IS NULL) OR gm.project_name = $2::VARCHAR)
  AND gm.is_main_line
ORDER BY tr.created_timestamp ASC
"#;

const FLAKY_TESTS_SQL: &str = r#"
WITH recent_runs AS (
    SELECT tr.id, tr.public_id, tr.created_timestamp
    FROM test_runs tr
    INNER JOIN git_metadata gm ON gm.test_run_id = tr.id
    WHERE gm.repo_name = $1
      AND (($2::VARCHAR IS NULL AND gm.project_name IS NULL) OR gm.project_name = $2::VARCHAR)
      AND gm.is_main_line
    ORDER BY tr.created_timestamp DESC
    LIMIT $3
)
SELECT
    ts.package_name,
    ts.class_name,
    tc.name AS test_name,
    COUNT(DISTINCT rr.id) AS failure_count,
    (ARRAY_AGG(rr.public_id ORDER BY rr.created_timestamp DESC))[1] AS latest_public_id,
    MAX(rr.created_timestamp) AS latest_failure_timestamp
FROM test_cases tc
INNER JOIN test_suites ts ON ts.id = tc.test_suite_id
INNER JOIN recent_runs rr ON rr.id = ts.test_run_id
WHERE tc.passed = FALSE AND tc.skipped = FALSE
GROUP BY ts.package_name, ts.class_name, tc.name
ORDER BY failure_count DESC, latest_failure_timestamp DESC
"#;

/// A case is flaky once it failed in at least `failure_threshold` distinct
/// runs. A case failing in exactly `failure_threshold` runs is included.
fn meets_failure_threshold(failure_count: i64, failure_threshold: i64) -> bool {
    failure_count >= failure_threshold
}

const PERFORMANCE_TIMELINE_SQL: &str = r#"
SELECT
    tr.public_id,
    tr.created_timestamp,
    tr.total_test_count,
    tr.cumulative_duration,
    tr.average_duration
FROM test_runs tr
INNER JOIN git_metadata gm ON gm.test_run_id = tr.id
WHERE gm.repo_name = $1
  AND (($2::VARCHAR IS NULL AND gm.project_name IS NULL) OR gm.project_name = $2::VARCHAR)
  AND gm.is_main_line
ORDER BY tr.created_timestamp ASC
"#;

const CURRENT_COVERAGE_SQL: &str = r#"
SELECT cs.covered_percentage
FROM coverage_stats cs
INNER JOIN test_runs tr ON tr.id = cs.test_run_id
INNER JOIN git_metadata gm ON gm.test_run_id = tr.id
WHERE gm.repo_name = $1
  AND (($2::VARCHAR IS NULL AND gm.project_name IS NULL) OR gm.project_name = $2::VARCHAR)
  AND gm.is_main_line
ORDER BY tr.created_timestamp DESC
LIMIT 1
"#;

#[derive(Debug, FromQueryResult)]
struct CoveredPercentageRow {
    covered_percentage: f64,
}

#[derive(Debug, FromQueryResult)]
struct FlakyTestRow {
    package_name: Option<String>,
    class_name: Option<String>,
    test_name: String,
    failure_count: i64,
    latest_public_id: String,
    latest_failure_timestamp: DateTime<Utc>,
}

impl DbPool {
    /// Run history for a repository, oldest first.
    pub async fn fetch_repository_timeline(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> AppResult<Vec<RepositoryTimelineEntry>> {
        let entries =
            RepositoryTimelineEntry::find_by_statement(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                TIMELINE_SQL,
                repo_values(repo_name, project_name),
            ))
            .all(self.connection())
            .await?;

        Ok(entries)
    }

    /// Coverage history for a repository, oldest first.
    pub async fn fetch_repository_coverage_timeline(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> AppResult<Vec<RepositoryCoverageTimelineEntry>> {
        let entries =
            RepositoryCoverageTimelineEntry::find_by_statement(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                COVERAGE_TIMELINE_SQL,
                repo_values(repo_name, project_name),
            ))
            .all(self.connection())
            .await?;

        Ok(entries)
    }

    /// Most recent coverage percentage for a repository, if any run reported one.
    pub async fn fetch_repository_current_coverage(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> AppResult<Option<f64>> {
        let row = CoveredPercentageRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            CURRENT_COVERAGE_SQL,
            repo_values(repo_name, project_name),
        ))
        .one(self.connection())
        .await?;

        Ok(row.map(|r| r.covered_percentage))
    }

    /// Cases that failed in at least `failure_threshold` of the most recent
    /// `max_runs` runs, most frequent first.
    pub async fn fetch_repository_flaky_tests(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
        params: FlakyTestsParams,
    ) -> AppResult<Vec<FlakyTest>> {
        let rows = FlakyTestRow::find_by_statement(Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            FLAKY_TESTS_SQL,
            [
                repo_name.into(),
                project_name.map(|s| s.to_string()).into(),
                params.max_runs.into(),
            ],
        ))
        .all(self.connection())
        .await?;

        Ok(rows
            .into_iter()
            .filter(|r| meets_failure_threshold(r.failure_count, params.failure_threshold))
            .map(|r| FlakyTest {
                package_name: r.package_name,
                class_name: r.class_name,
                test_name: r.test_name,
                failure_count: r.failure_count,
                latest_public_id: r.latest_public_id,
                latest_failure_timestamp: r.latest_failure_timestamp,
            })
            .collect())
    }

    /// Duration trend for a repository, oldest first.
    pub async fn fetch_repository_performance_timeline(
        &self,
        repo_name: &str,
        project_name: Option<&str>,
    ) -> AppResult<Vec<RepositoryPerformanceTimelineEntry>> {
        let entries = RepositoryPerformanceTimelineEntry::find_by_statement(
            Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                PERFORMANCE_TIMELINE_SQL,
                repo_values(repo_name, project_name),
            ),
        )
        .all(self.connection())
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_failing_in_exactly_threshold_runs_is_flaky() {
        assert!(meets_failure_threshold(2, 2));
        assert!(meets_failure_threshold(3, 2));
    }

    #[test]
    fn case_failing_below_threshold_is_not_flaky() {
        assert!(!meets_failure_threshold(1, 2));
        assert!(!meets_failure_threshold(0, 2));
    }

    #[test]
    fn default_params_require_two_failing_runs_among_fifty() {
        let params = FlakyTestsParams::default();
        assert_eq!(params.failure_threshold, 2);
        assert_eq!(params.max_runs, 50);
    }
}
