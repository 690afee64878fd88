//! Test run API handlers: ingest parsed results, read runs back.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::{DbPool, TestRunRepository};
use crate::error::{AppError, AppResult};
use crate::models::{
    CoveragePayload, GroupedResults, ParsedTestSuite, PublicId, TestRunSummary, TestSuiteOutput,
};

/// Ungrouped ingest payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResultsPayload {
    pub test_suites: Vec<ParsedTestSuite>,
}

/// Response for both ingest endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct SaveResultsResponse {
    /// Generated public identifier of the new run.
    pub id: String,
    pub summary: TestRunSummary,
}

/// Ingest an ungrouped set of parsed test suites as a new run.
#[utoipa::path(
    post,
    path = "/api/v1/results",
    tag = "Test Runs",
    request_body = ResultsPayload,
    responses(
        (status = 200, description = "Run persisted", body = SaveResultsResponse),
        (status = 409, description = "Public identifier collision"),
    )
)]
pub async fn save_results(
    pool: web::Data<DbPool>,
    payload: web::Json<ResultsPayload>,
) -> AppResult<HttpResponse> {
    let public_id = PublicId::generate();
    let summary = pool
        .save_test_run(&public_id, payload.into_inner().test_suites)
        .await?;

    Ok(HttpResponse::Ok().json(SaveResultsResponse {
        id: public_id.to_string(),
        summary,
    }))
}

/// Ingest grouped parsed results as a new run.
#[utoipa::path(
    post,
    path = "/api/v1/results/grouped",
    tag = "Test Runs",
    request_body = GroupedResults,
    responses(
        (status = 200, description = "Run persisted", body = SaveResultsResponse),
        (status = 409, description = "Public identifier collision"),
    )
)]
pub async fn save_grouped_results(
    pool: web::Data<DbPool>,
    payload: web::Json<GroupedResults>,
) -> AppResult<HttpResponse> {
    let public_id = PublicId::generate();
    let summary = pool
        .save_grouped_test_run(&public_id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(SaveResultsResponse {
        id: public_id.to_string(),
        summary,
    }))
}

/// Fetch a full test run tree by public identifier.
#[utoipa::path(
    get,
    path = "/api/v1/run/{public_id}",
    tag = "Test Runs",
    params(("public_id" = String, Path, description = "Public run identifier")),
    responses(
        (status = 200, description = "The full run", body = crate::models::TestRun),
        (status = 404, description = "No run with this identifier"),
    )
)]
pub async fn get_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let public_id = PublicId::new(path.into_inner());
    let test_run = pool
        .fetch_test_run(&public_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test run {}", public_id)))?;

    Ok(HttpResponse::Ok().json(test_run))
}

/// Fetch only the aggregate summary of a run (lighter read path for listings).
#[utoipa::path(
    get,
    path = "/api/v1/run/{public_id}/summary",
    tag = "Test Runs",
    params(("public_id" = String, Path, description = "Public run identifier")),
    responses(
        (status = 200, description = "The run summary", body = TestRunSummary),
        (status = 404, description = "No run with this identifier"),
    )
)]
pub async fn get_test_run_summary(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let public_id = PublicId::new(path.into_inner());
    let summary = pool
        .fetch_test_run_summary(&public_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test run {}", public_id)))?;

    Ok(HttpResponse::Ok().json(summary))
}

async fn suite_output(
    pool: &DbPool,
    public_id: PublicId,
    suite_idx: i32,
    select: fn(&crate::entity::test_suite::Model) -> Option<String>,
) -> AppResult<HttpResponse> {
    let suite = pool
        .fetch_test_suite(&public_id, suite_idx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Test suite {} in run {}", suite_idx, public_id))
        })?;

    Ok(HttpResponse::Ok().json(TestSuiteOutput {
        value: select(&suite),
    }))
}

/// Fetch the captured stdout of one suite.
#[utoipa::path(
    get,
    path = "/api/v1/run/{public_id}/suite/{suite_idx}/system-out",
    tag = "Test Runs",
    params(
        ("public_id" = String, Path, description = "Public run identifier"),
        ("suite_idx" = i32, Path, description = "1-based suite index"),
    ),
    responses(
        (status = 200, description = "Suite stdout", body = TestSuiteOutput),
        (status = 404, description = "No such run or suite"),
    )
)]
pub async fn get_suite_system_out(
    pool: web::Data<DbPool>,
    path: web::Path<(String, i32)>,
) -> AppResult<HttpResponse> {
    let (public_id, suite_idx) = path.into_inner();
    suite_output(&pool, PublicId::new(public_id), suite_idx, |s| {
        s.system_out.clone()
    })
    .await
}

/// Fetch the captured stderr of one suite.
#[utoipa::path(
    get,
    path = "/api/v1/run/{public_id}/suite/{suite_idx}/system-err",
    tag = "Test Runs",
    params(
        ("public_id" = String, Path, description = "Public run identifier"),
        ("suite_idx" = i32, Path, description = "1-based suite index"),
    ),
    responses(
        (status = 200, description = "Suite stderr", body = TestSuiteOutput),
        (status = 404, description = "No such run or suite"),
    )
)]
pub async fn get_suite_system_err(
    pool: web::Data<DbPool>,
    path: web::Path<(String, i32)>,
) -> AppResult<HttpResponse> {
    let (public_id, suite_idx) = path.into_inner();
    suite_output(&pool, PublicId::new(public_id), suite_idx, |s| {
        s.system_err.clone()
    })
    .await
}

/// Record coverage stats for an existing run.
#[utoipa::path(
    post,
    path = "/api/v1/run/{public_id}/coverage",
    tag = "Test Runs",
    request_body = CoveragePayload,
    params(("public_id" = String, Path, description = "Public run identifier")),
    responses(
        (status = 200, description = "Coverage recorded"),
        (status = 404, description = "No run with this identifier"),
        (status = 409, description = "Coverage already recorded for this run"),
    )
)]
pub async fn save_run_coverage(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    payload: web::Json<CoveragePayload>,
) -> AppResult<HttpResponse> {
    let public_id = PublicId::new(path.into_inner());
    pool.save_coverage(&public_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Pin a run so retention never removes it.
#[utoipa::path(
    post,
    path = "/api/v1/run/{public_id}/attributes/pin",
    tag = "Test Runs",
    params(("public_id" = String, Path, description = "Public run identifier")),
    responses(
        (status = 204, description = "Run pinned"),
        (status = 404, description = "No run with this identifier"),
    )
)]
pub async fn pin_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let public_id = PublicId::new(path.into_inner());
    pool.set_pinned(&public_id, true).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Unpin a run.
#[utoipa::path(
    post,
    path = "/api/v1/run/{public_id}/attributes/unpin",
    tag = "Test Runs",
    params(("public_id" = String, Path, description = "Public run identifier")),
    responses(
        (status = 204, description = "Run unpinned"),
        (status = 404, description = "No run with this identifier"),
    )
)]
pub async fn unpin_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let public_id = PublicId::new(path.into_inner());
    pool.set_pinned(&public_id, false).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Fetch a run's system attributes.
#[utoipa::path(
    get,
    path = "/api/v1/run/{public_id}/attributes",
    tag = "Test Runs",
    params(("public_id" = String, Path, description = "Public run identifier")),
    responses(
        (status = 200, description = "System attributes", body = crate::models::TestRunSystemAttributes),
        (status = 404, description = "No run with this identifier"),
    )
)]
pub async fn get_run_attributes(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let public_id = PublicId::new(path.into_inner());
    let attributes = pool.fetch_system_attributes(&public_id).await?;

    Ok(HttpResponse::Ok().json(attributes))
}

/// Configure test run routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/results").route(web::post().to(save_results)))
        .service(web::resource("/results/grouped").route(web::post().to(save_grouped_results)))
        .service(web::resource("/run/{public_id}").route(web::get().to(get_test_run)))
        .service(web::resource("/run/{public_id}/summary").route(web::get().to(get_test_run_summary)))
        .service(
            web::resource("/run/{public_id}/suite/{suite_idx}/system-out")
                .route(web::get().to(get_suite_system_out)),
        )
        .service(
            web::resource("/run/{public_id}/suite/{suite_idx}/system-err")
                .route(web::get().to(get_suite_system_err)),
        )
        .service(web::resource("/run/{public_id}/coverage").route(web::post().to(save_run_coverage)))
        .service(web::resource("/run/{public_id}/attributes").route(web::get().to(get_run_attributes)))
        .service(web::resource("/run/{public_id}/attributes/pin").route(web::post().to(pin_test_run)))
        .service(
            web::resource("/run/{public_id}/attributes/unpin").route(web::post().to(unpin_test_run)),
        );
}
