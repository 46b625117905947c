use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Admin endpoints
        crate::api::handlers::admin::get_users,
        crate::api::handlers::admin::get_vhvs,

        // Auth endpoints
        care_dashboard_domain::auth::auth_info
    ),
    components(
        schemas(
            // Entities
            crate::entities::User,
            crate::entities::Vhv,
            crate::entities::UserRole,
            crate::entities::common::ErrorBody,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Auth schemas
            care_dashboard_domain::auth::UserInfo,
            care_dashboard_domain::auth::Claims,
            care_dashboard_domain::auth::AppMetadata,
            care_dashboard_domain::auth::UserMetadata
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "admin", description = "Directory listings for administrators"),
        (name = "Authentication", description = "Authentication and authorization endpoints")
    ),
    info(
        title = "CareDashboard API",
        version = "0.1.0",
        description = "Admin directory endpoints for the CareDashboard healthcare dashboard",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "CareDashboard API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "admin"));
        assert!(tags.iter().any(|tag| tag.name == "health"));

        assert!(openapi.paths.paths.contains_key("/health"));
        assert!(openapi.paths.paths.contains_key("/api/admin/users"));
        assert!(openapi.paths.paths.contains_key("/api/admin/vhvs"));
        assert!(openapi.paths.paths.contains_key("/auth/info"));
    }

    #[test]
    fn test_error_body_schema_is_registered() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.unwrap();

        assert!(components.schemas.contains_key("ErrorBody"));
        assert!(components.schemas.contains_key("User"));
        assert!(components.schemas.contains_key("Vhv"));
    }
}
