//! Domain error types for the test run server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Unique constraint violated (e.g. duplicate public ID)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code, response_message) = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::NotFound(_) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                self.to_string(),
            ),
            AppError::Conflict(_) => (
                actix_web::http::StatusCode::CONFLICT,
                "CONFLICT",
                self.to_string(),
            ),
            AppError::InvalidInput(_) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message: response_message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
            _ => AppError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    async fn missing_run() -> AppResult<HttpResponse> {
        Err(AppError::NotFound("Test run ABC123456789".to_string()))
    }

    async fn duplicate_run() -> AppResult<HttpResponse> {
        Err(AppError::Conflict(
            "duplicate key value violates unique constraint".to_string(),
        ))
    }

    async fn broken_database() -> AppResult<HttpResponse> {
        Err(AppError::Database(
            "connection refused at db:5432".to_string(),
        ))
    }

    #[actix_web::test]
    async fn unknown_run_yields_404_with_error_body() {
        let app = test::init_service(
            App::new().route("/run/{public_id}", web::get().to(missing_run)),
        )
        .await;

        let req = test::TestRequest::get().uri("/run/ABC123456789").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "NOT_FOUND");
        assert_eq!(body["message"], "Test run ABC123456789 not found");
    }

    #[actix_web::test]
    async fn conflict_yields_409() {
        let app =
            test::init_service(App::new().route("/results", web::post().to(duplicate_run)))
                .await;

        let req = test::TestRequest::post().uri("/results").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "CONFLICT");
    }

    #[actix_web::test]
    async fn database_error_yields_500_without_leaking_detail() {
        let app =
            test::init_service(App::new().route("/run/x", web::get().to(broken_database)))
                .await;

        let req = test::TestRequest::get().uri("/run/x").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        let message = body["message"].as_str().unwrap_or_default();
        assert!(!message.contains("db:5432"));
    }
}
