#[cfg(test)]
mod health_tests {
    use std::sync::Arc;

    use axum::{http::StatusCode, response::IntoResponse, Extension};
    use http_body_util::BodyExt;
    use serde_json::Value;

    use care_dashboard_domain::health::ComponentStatus;
    use care_dashboard_domain::testing::create_mock_health_service;

    use crate::api::handlers::health::{health_check, initialize_server_start_time, SharedHealthService};

    async fn check(service: SharedHealthService) -> (StatusCode, Value) {
        let response = health_check(Extension(service)).await.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_check_healthy() {
        initialize_server_start_time();

        let (status, body) = check(Arc::new(create_mock_health_service())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["components"]["database"]["status"], "ok");
        assert_eq!(body["components"]["directory"]["status"], "ok");
        assert_eq!(body["components"]["api"]["status"], "ok");
        assert!(body["uptime"].is_u64());
    }

    #[tokio::test]
    async fn test_health_check_degraded_directory() {
        let service = create_mock_health_service().with_component(
            "directory",
            ComponentStatus::Degraded,
            Some("backend: database (in-memory fallback)".to_string()),
        );

        let (status, body) = check(Arc::new(service)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["components"]["directory"]["message"], "backend: database (in-memory fallback)");
    }

    #[tokio::test]
    async fn test_health_check_unhealthy_database() {
        let service = create_mock_health_service().with_component(
            "database",
            ComponentStatus::Unhealthy,
            Some("Database connection failed".to_string()),
        );

        let (status, body) = check(Arc::new(service)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["components"]["database"]["status"], "error");
    }
}
