//! API models for repository-level aggregate views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Run history for one repository.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepositoryTimeline {
    pub repo_name: String,
    pub project_name: Option<String>,
    pub timeline_entries: Vec<RepositoryTimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sea_orm::FromQueryResult)]
pub struct RepositoryTimelineEntry {
    pub public_id: String,
    pub created_timestamp: DateTime<Utc>,
    pub total_test_count: i32,
    pub total_failure_count: i32,
    pub passed: bool,
    pub cumulative_duration: f64,
    pub average_duration: f64,
}

/// Line-coverage history for one repository.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepositoryCoverageTimeline {
    pub repo_name: String,
    pub project_name: Option<String>,
    pub timeline_entries: Vec<RepositoryCoverageTimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sea_orm::FromQueryResult)]
pub struct RepositoryCoverageTimelineEntry {
    pub public_id: String,
    pub created_timestamp: DateTime<Utc>,
    pub covered_percentage: f64,
    pub covered_lines: i32,
    pub total_lines: i32,
}

/// Flaky tests detected across a repository's recent runs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepositoryFlakyTests {
    pub repo_name: String,
    pub project_name: Option<String>,
    pub flaky_tests: Vec<FlakyTest>,
}

/// A test case that failed in more than the threshold number of runs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FlakyTest {
    pub package_name: Option<String>,
    pub class_name: Option<String>,
    pub test_name: String,
    /// Number of distinct runs in which this case failed.
    pub failure_count: i64,
    pub latest_public_id: String,
    pub latest_failure_timestamp: DateTime<Utc>,
}

/// Duration trend for one repository.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RepositoryPerformanceTimeline {
    pub repo_name: String,
    pub project_name: Option<String>,
    pub timeline_entries: Vec<RepositoryPerformanceTimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sea_orm::FromQueryResult)]
pub struct RepositoryPerformanceTimelineEntry {
    pub public_id: String,
    pub created_timestamp: DateTime<Utc>,
    pub total_test_count: i32,
    pub cumulative_duration: f64,
    pub average_duration: f64,
}

/// Coverage stats submitted for a run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoveragePayload {
    pub covered_percentage: f64,
    pub covered_lines: i32,
    pub total_lines: i32,
}
