//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Test Run Server",
        version = "0.4.0",
        description = "API server for ingesting parsed test results and viewing run history, failures, coverage, and flaky-test trends"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Run endpoints
        api::test_runs::save_results,
        api::test_runs::save_grouped_results,
        api::test_runs::get_test_run,
        api::test_runs::get_test_run_summary,
        api::test_runs::get_suite_system_out,
        api::test_runs::get_suite_system_err,
        api::test_runs::save_run_coverage,
        api::test_runs::pin_test_run,
        api::test_runs::unpin_test_run,
        api::test_runs::get_run_attributes,
        // Repository endpoints
        api::repositories::get_timeline,
        api::repositories::get_project_timeline,
        api::repositories::get_coverage_timeline,
        api::repositories::get_project_coverage_timeline,
        api::repositories::get_coverage_badge,
        api::repositories::get_project_coverage_badge,
        api::repositories::get_flaky_tests,
        api::repositories::get_project_flaky_tests,
        api::repositories::get_performance_timeline,
        api::repositories::get_project_performance_timeline,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Parsed results
            models::ParsedTestSuite,
            models::ParsedTestCase,
            models::ParsedTestFailure,
            models::GroupedResults,
            models::GroupedTestSuites,
            models::ResultsMetadata,
            models::GitMetadata,
            // Runs
            models::PublicId,
            models::TestRun,
            models::TestRunSummary,
            models::TestSuite,
            models::TestCase,
            models::TestFailure,
            models::TestSuiteOutput,
            models::TestRunSystemAttributes,
            models::CoveragePayload,
            api::test_runs::ResultsPayload,
            api::test_runs::SaveResultsResponse,
            // Repositories
            models::RepositoryTimeline,
            models::RepositoryTimelineEntry,
            models::RepositoryCoverageTimeline,
            models::RepositoryCoverageTimelineEntry,
            models::RepositoryFlakyTests,
            models::FlakyTest,
            models::RepositoryPerformanceTimeline,
            models::RepositoryPerformanceTimelineEntry,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Test Runs", description = "Ingest parsed results and read runs back"),
        (name = "Repositories", description = "Repository-level aggregate views")
    )
)]
pub struct ApiDoc;
