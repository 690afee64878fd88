//! API models for test runs as read back from the server.

use chrono::{DateTime, Utc};
use rand::RngExt;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Length of generated public identifiers.
const PUBLIC_ID_LENGTH: usize = 12;

/// Opaque external handle for a test run, decoupled from the internal
/// numeric primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PublicId(pub String);

impl PublicId {
    pub fn new(id: impl Into<String>) -> Self {
        PublicId(id.into())
    }

    /// Generate a random alphanumeric public identifier.
    pub fn generate() -> Self {
        let id: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(PUBLIC_ID_LENGTH)
            .map(char::from)
            .collect();
        PublicId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PublicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Aggregate summary of one test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TestRunSummary {
    /// Public identifier of the run.
    pub id: String,
    pub total_test_count: i32,
    pub total_passing_count: i32,
    pub total_skipped_count: i32,
    pub total_failure_count: i32,
    pub passed: bool,
    /// Sum of all suite durations in seconds.
    pub cumulative_duration: f64,
    /// Cumulative duration divided by total test count (0 for empty runs).
    pub average_duration: f64,
    pub slowest_test_case_duration: f64,
    pub created_timestamp: DateTime<Utc>,
}

/// A full test run: summary plus the suite/case/failure tree.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestRun {
    /// Public identifier of the run.
    pub id: String,
    pub summary: TestRunSummary,
    pub test_suites: Vec<TestSuite>,
}

/// One suite within a fetched run, with its group info where present.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestSuite {
    /// 1-based index, unique within the run and contiguous across groups.
    pub idx: i32,
    pub package_name: Option<String>,
    pub class_name: String,
    pub test_count: i32,
    pub passing_count: i32,
    pub skipped_count: i32,
    pub failure_count: i32,
    pub duration: f64,
    pub start_ts: Option<DateTime<Utc>>,
    pub hostname: Option<String>,
    pub group_name: Option<String>,
    pub group_label: Option<String>,
    pub test_cases: Vec<TestCase>,
}

/// One case within a fetched suite.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestCase {
    /// 1-based index, unique and contiguous within the suite.
    pub idx: i32,
    pub name: String,
    pub class_name: Option<String>,
    pub duration: f64,
    pub passed: bool,
    pub skipped: bool,
    pub failure: Option<TestFailure>,
}

/// Failure detail for a failed case.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestFailure {
    pub failure_message: Option<String>,
    pub failure_type: Option<String>,
    pub failure_text: Option<String>,
}

/// System-out/system-err payload for one suite.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestSuiteOutput {
    pub value: Option<String>,
}

/// Mutable per-run attributes (everything else is immutable after ingestion).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestRunSystemAttributes {
    pub pinned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_public_ids_are_alphanumeric_and_fixed_length() {
        let id = PublicId::generate();
        assert_eq!(id.as_str().len(), PUBLIC_ID_LENGTH);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_public_ids_differ() {
        assert_ne!(PublicId::generate(), PublicId::generate());
    }
}
