//! API endpoint modules.

pub mod health;
pub mod openapi;
pub mod repositories;
pub mod test_runs;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use repositories::configure_routes as configure_repository_routes;
pub use test_runs::configure_routes as configure_run_routes;
