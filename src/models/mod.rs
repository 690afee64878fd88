//! Domain models for the test run server.

pub mod parsed;
pub mod repository;
pub mod test_run;

// Re-export commonly used types
pub use parsed::{
    GitMetadata, GroupedResults, GroupedTestSuites, ParsedTestCase, ParsedTestFailure,
    ParsedTestSuite, ResultsMetadata,
};
pub use repository::{
    CoveragePayload, FlakyTest, RepositoryCoverageTimeline, RepositoryCoverageTimelineEntry,
    RepositoryFlakyTests, RepositoryPerformanceTimeline, RepositoryPerformanceTimelineEntry,
    RepositoryTimeline, RepositoryTimelineEntry,
};
pub use test_run::{
    PublicId, TestCase, TestFailure, TestRun, TestRunSummary, TestRunSystemAttributes, TestSuite,
    TestSuiteOutput,
};
