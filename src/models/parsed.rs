//! In-memory representation of parsed test results.
//!
//! Produced upstream by the results-file parser; the ingest endpoints accept
//! the same shape as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One parsed test suite, typically corresponding to a test class.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedTestSuite {
    /// Fully qualified suite name ("com.example.MyTest" or just "MyTest").
    pub name: String,
    /// Suite duration in seconds, when reported by the results file.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Suite start timestamp.
    #[serde(default)]
    pub start_ts: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub system_out: Option<String>,
    #[serde(default)]
    pub system_err: Option<String>,
    #[serde(default)]
    pub test_cases: Vec<ParsedTestCase>,
}

/// One parsed test case within a suite.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedTestCase {
    pub name: String,
    #[serde(default)]
    pub class_name: Option<String>,
    /// Case duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    pub passed: bool,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub failure: Option<ParsedTestFailure>,
}

/// Failure detail attached to a failed test case.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ParsedTestFailure {
    #[serde(default)]
    pub failure_message: Option<String>,
    #[serde(default)]
    pub failure_type: Option<String>,
    #[serde(default)]
    pub failure_text: Option<String>,
}

/// A full set of results partitioned into named groups (e.g. per module).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupedResults {
    pub grouped_test_suites: Vec<GroupedTestSuites>,
    #[serde(default)]
    pub metadata: Option<ResultsMetadata>,
}

/// One named partition of a run's suites.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GroupedTestSuites {
    pub group_name: String,
    #[serde(default)]
    pub group_label: Option<String>,
    pub test_suites: Vec<ParsedTestSuite>,
}

/// Metadata submitted alongside grouped results.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResultsMetadata {
    #[serde(default)]
    pub git: Option<GitMetadata>,
}

/// Version-control context for a run, used by the repository views.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GitMetadata {
    /// Repository name in "org/repo" form.
    pub repo_name: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default = "default_main_line")]
    pub is_main_line: bool,
}

fn default_main_line() -> bool {
    true
}
