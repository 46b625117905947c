use axum::{
    middleware,
    routing::get,
    Router,
    Extension,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use care_dashboard_domain::auth::{auth_info, auth_middleware, authorize, configure_auth, session_middleware};
use care_dashboard_domain::services::{create_default_directory_service, DirectoryError, SharedDirectoryService};

use crate::api::handlers::{admin, dashboard, health};
use crate::api::handlers::health::SharedHealthService;
use crate::openapi::configure_swagger_routes;
use crate::pages::{DashboardView, DoctorDashboard, PatientDashboard, VhvDashboard};

/// Router state shared by the admin handlers and the middleware
pub type AppState = SharedDirectoryService;

/// Create the application router with the directory client selected by the environment
pub async fn create_app() -> Result<Router, DirectoryError> {
    debug!("Creating application router");

    let directory = create_default_directory_service()?;
    let health_service = health::create_health_service(directory.backend_name());

    Ok(create_app_with(directory, health_service))
}

/// Create the application router around the given services
pub fn create_app_with(directory: SharedDirectoryService, health_service: SharedHealthService) -> Router {
    // Authorization runs inside authentication: layers apply bottom-up
    let admin_routes = Router::new()
        .route("/api/admin/users", get(admin::get_users))
        .route("/api/admin/vhvs", get(admin::get_vhvs))
        .layer(middleware::from_fn_with_state(
            directory.clone(),
            authorize::require_role::<AppState>("admin")
        ))
        .layer(middleware::from_fn_with_state(
            directory.clone(),
            auth_middleware::<AppState>
        ));

    debug!("Admin routes configured");

    // Pages resolve the session but leave the decision to their guard
    let page_routes = Router::new()
        .route(DoctorDashboard::PATH, get(dashboard::doctor_dashboard))
        .route(PatientDashboard::PATH, get(dashboard::patient_dashboard))
        .route(VhvDashboard::PATH, get(dashboard::vhv_dashboard))
        .layer(middleware::from_fn_with_state(
            directory.clone(),
            session_middleware::<AppState>
        ));

    debug!("Dashboard pages configured");

    let auth_routes = Router::new()
        .route("/auth/info", get(auth_info))
        .layer(middleware::from_fn_with_state(
            directory.clone(),
            auth_middleware::<AppState>
        ));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(admin_routes)
        .merge(page_routes)
        .with_state(directory);

    debug!("Routes merged");

    let app = add_swagger_ui(app);
    let app = configure_auth(app);

    health::initialize_server_start_time();

    app.layer(TraceLayer::new_for_http())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
