pub mod handlers;
pub mod routes;

use axum::Router;
use care_dashboard_domain::services::DirectoryError;

/// Create the application router
pub async fn create_application() -> Result<Router, DirectoryError> {
    routes::create_app().await
}
