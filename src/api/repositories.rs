//! Repository-level read API: timelines, flaky tests, coverage badge.
//!
//! Every endpoint exists in a plain and a `/project/{project}` variant;
//! repository names are two path segments ("org/repo").

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::DbPool;
use crate::db::repositories::FlakyTestsParams;
use crate::error::{AppError, AppResult};
use crate::models::{
    RepositoryCoverageTimeline, RepositoryFlakyTests, RepositoryPerformanceTimeline,
    RepositoryTimeline,
};
use crate::services::badge;

fn repo_name(org: &str, repo: &str) -> String {
    format!("{}/{}", org, repo)
}

/// Query parameters for flaky test detection.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FlakyTestsQuery {
    /// Minimum distinct failing runs for a case to count as flaky (default 2).
    pub threshold: Option<i64>,
    /// How many recent runs to consider (default 50).
    pub max_runs: Option<i64>,
}

async fn timeline(
    pool: &DbPool,
    repo_name: String,
    project_name: Option<String>,
) -> AppResult<HttpResponse> {
    let entries = pool
        .fetch_repository_timeline(&repo_name, project_name.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(RepositoryTimeline {
        repo_name,
        project_name,
        timeline_entries: entries,
    }))
}

async fn coverage_timeline(
    pool: &DbPool,
    repo_name: String,
    project_name: Option<String>,
) -> AppResult<HttpResponse> {
    let entries = pool
        .fetch_repository_coverage_timeline(&repo_name, project_name.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(RepositoryCoverageTimeline {
        repo_name,
        project_name,
        timeline_entries: entries,
    }))
}

async fn coverage_badge(
    pool: &DbPool,
    repo_name: String,
    project_name: Option<String>,
) -> AppResult<HttpResponse> {
    let percentage = pool
        .fetch_repository_current_coverage(&repo_name, project_name.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Coverage for repository {}", repo_name)))?;

    Ok(HttpResponse::Ok()
        .content_type("image/svg+xml")
        .body(badge::render_coverage_badge(percentage)))
}

async fn flaky_tests(
    pool: &DbPool,
    repo_name: String,
    project_name: Option<String>,
    query: FlakyTestsQuery,
) -> AppResult<HttpResponse> {
    let defaults = FlakyTestsParams::default();
    let params = FlakyTestsParams {
        failure_threshold: query.threshold.unwrap_or(defaults.failure_threshold),
        max_runs: query.max_runs.unwrap_or(defaults.max_runs),
    };

    let flaky = pool
        .fetch_repository_flaky_tests(&repo_name, project_name.as_deref(), params)
        .await?;

    Ok(HttpResponse::Ok().json(RepositoryFlakyTests {
        repo_name,
        project_name,
        flaky_tests: flaky,
    }))
}

async fn performance_timeline(
    pool: &DbPool,
    repo_name: String,
    project_name: Option<String>,
) -> AppResult<HttpResponse> {
    let entries = pool
        .fetch_repository_performance_timeline(&repo_name, project_name.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(RepositoryPerformanceTimeline {
        repo_name,
        project_name,
        timeline_entries: entries,
    }))
}

/// Run history for a repository.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/timeline",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
    ),
    responses((status = 200, description = "Run timeline", body = RepositoryTimeline))
)]
pub async fn get_timeline(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (org, repo) = path.into_inner();
    timeline(&pool, repo_name(&org, &repo), None).await
}

/// Run history for one project within a repository.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/project/{project}/timeline",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
        ("project" = String, Path, description = "Project name"),
    ),
    responses((status = 200, description = "Run timeline", body = RepositoryTimeline))
)]
pub async fn get_project_timeline(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String, String)>,
) -> AppResult<HttpResponse> {
    let (org, repo, project) = path.into_inner();
    timeline(&pool, repo_name(&org, &repo), Some(project)).await
}

/// Coverage history for a repository.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/coverage/timeline",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
    ),
    responses((status = 200, description = "Coverage timeline", body = RepositoryCoverageTimeline))
)]
pub async fn get_coverage_timeline(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (org, repo) = path.into_inner();
    coverage_timeline(&pool, repo_name(&org, &repo), None).await
}

/// Coverage history for one project within a repository.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/project/{project}/coverage/timeline",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
        ("project" = String, Path, description = "Project name"),
    ),
    responses((status = 200, description = "Coverage timeline", body = RepositoryCoverageTimeline))
)]
pub async fn get_project_coverage_timeline(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String, String)>,
) -> AppResult<HttpResponse> {
    let (org, repo, project) = path.into_inner();
    coverage_timeline(&pool, repo_name(&org, &repo), Some(project)).await
}

/// SVG coverage badge for a repository's most recent covered run.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/badge/coverage",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
    ),
    responses(
        (status = 200, description = "SVG badge", content_type = "image/svg+xml"),
        (status = 404, description = "No coverage recorded for this repository"),
    )
)]
pub async fn get_coverage_badge(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (org, repo) = path.into_inner();
    coverage_badge(&pool, repo_name(&org, &repo), None).await
}

/// SVG coverage badge for one project within a repository.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/project/{project}/badge/coverage",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
        ("project" = String, Path, description = "Project name"),
    ),
    responses(
        (status = 200, description = "SVG badge", content_type = "image/svg+xml"),
        (status = 404, description = "No coverage recorded for this project"),
    )
)]
pub async fn get_project_coverage_badge(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String, String)>,
) -> AppResult<HttpResponse> {
    let (org, repo, project) = path.into_inner();
    coverage_badge(&pool, repo_name(&org, &repo), Some(project)).await
}

/// Flaky tests across a repository's recent runs.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/tests/flaky",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
        FlakyTestsQuery,
    ),
    responses((status = 200, description = "Flaky tests", body = RepositoryFlakyTests))
)]
pub async fn get_flaky_tests(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
    query: web::Query<FlakyTestsQuery>,
) -> AppResult<HttpResponse> {
    let (org, repo) = path.into_inner();
    flaky_tests(&pool, repo_name(&org, &repo), None, query.into_inner()).await
}

/// Flaky tests for one project within a repository.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/project/{project}/tests/flaky",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
        ("project" = String, Path, description = "Project name"),
        FlakyTestsQuery,
    ),
    responses((status = 200, description = "Flaky tests", body = RepositoryFlakyTests))
)]
pub async fn get_project_flaky_tests(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String, String)>,
    query: web::Query<FlakyTestsQuery>,
) -> AppResult<HttpResponse> {
    let (org, repo, project) = path.into_inner();
    flaky_tests(
        &pool,
        repo_name(&org, &repo),
        Some(project),
        query.into_inner(),
    )
    .await
}

/// Duration trend for a repository.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/performance/timeline",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
    ),
    responses((status = 200, description = "Performance timeline", body = RepositoryPerformanceTimeline))
)]
pub async fn get_performance_timeline(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (org, repo) = path.into_inner();
    performance_timeline(&pool, repo_name(&org, &repo), None).await
}

/// Duration trend for one project within a repository.
#[utoipa::path(
    get,
    path = "/api/v1/repo/{org}/{repo}/project/{project}/performance/timeline",
    tag = "Repositories",
    params(
        ("org" = String, Path, description = "Repository organization"),
        ("repo" = String, Path, description = "Repository name"),
        ("project" = String, Path, description = "Project name"),
    ),
    responses((status = 200, description = "Performance timeline", body = RepositoryPerformanceTimeline))
)]
pub async fn get_project_performance_timeline(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String, String)>,
) -> AppResult<HttpResponse> {
    let (org, repo, project) = path.into_inner();
    performance_timeline(&pool, repo_name(&org, &repo), Some(project)).await
}

/// Configure repository routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/repo/{org}/{repo}/timeline").route(web::get().to(get_timeline)))
        .service(
            web::resource("/repo/{org}/{repo}/project/{project}/timeline")
                .route(web::get().to(get_project_timeline)),
        )
        .service(
            web::resource("/repo/{org}/{repo}/coverage/timeline")
                .route(web::get().to(get_coverage_timeline)),
        )
        .service(
            web::resource("/repo/{org}/{repo}/project/{project}/coverage/timeline")
                .route(web::get().to(get_project_coverage_timeline)),
        )
        .service(
            web::resource("/repo/{org}/{repo}/badge/coverage")
                .route(web::get().to(get_coverage_badge)),
        )
        .service(
            web::resource("/repo/{org}/{repo}/project/{project}/badge/coverage")
                .route(web::get().to(get_project_coverage_badge)),
        )
        .service(
            web::resource("/repo/{org}/{repo}/tests/flaky").route(web::get().to(get_flaky_tests)),
        )
        .service(
            web::resource("/repo/{org}/{repo}/project/{project}/tests/flaky")
                .route(web::get().to(get_project_flaky_tests)),
        )
        .service(
            web::resource("/repo/{org}/{repo}/performance/timeline")
                .route(web::get().to(get_performance_timeline)),
        )
        .service(
            web::resource("/repo/{org}/{repo}/project/{project}/performance/timeline")
                .route(web::get().to(get_project_performance_timeline)),
        );
}
