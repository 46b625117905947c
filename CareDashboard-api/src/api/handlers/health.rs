use axum::{http::StatusCode, response::IntoResponse, Json, Extension};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use std::time::{SystemTime, UNIX_EPOCH};
use std::sync::Arc;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use async_trait::async_trait;

use care_dashboard_domain::health::{
    self, HealthServiceTrait, SystemStatus, ComponentStatus as DomainComponentStatus,
    HealthComponent as DomainHealthComponent, SystemHealth,
};

/// Shared health service handle
pub type SharedHealthService = Arc<dyn HealthServiceTrait + Send + Sync>;

/// Health check response model
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok", "degraded", or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Details about various components of the system
    pub components: ComponentStatus,
    /// Environment information
    pub environment: String,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Database connection status
    pub database: ComponentHealthStatus,
    /// Directory client status
    pub directory: ComponentHealthStatus,
    /// API status
    pub api: ComponentHealthStatus,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok", "degraded", or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the server start time for uptime reporting
pub fn initialize_server_start_time() {
    SERVER_START_TIME.get_or_init(unix_now);
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service))]
pub async fn health_check(
    Extension(health_service): Extension<SharedHealthService>,
) -> impl IntoResponse {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = health_service.get_system_health().await;

    let (overall_status, status_code) = match system_health.status {
        SystemStatus::Healthy => ("ok", StatusCode::OK),
        SystemStatus::Degraded => ("degraded", StatusCode::SERVICE_UNAVAILABLE),
        SystemStatus::Unhealthy => ("error", StatusCode::INTERNAL_SERVER_ERROR),
    };

    let component = |name: &str| match system_health.components.get(name) {
        Some(c) => ComponentHealthStatus {
            status: map_component_status(&c.status),
            message: c.details.clone(),
        },
        None => ComponentHealthStatus {
            status: map_component_status(&DomainComponentStatus::Healthy),
            message: None,
        },
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: ComponentStatus {
            database: component("database"),
            directory: component("directory"),
            api: component("api"),
        },
        environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
    };

    (status_code, Json(response))
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }.to_string()
}

/// Health service reporting the database, the directory client and the API
#[derive(Debug)]
pub struct HealthService {
    directory_backend: &'static str,
}

impl HealthService {
    /// Create a health service for the given directory backend
    pub fn new(directory_backend: &'static str) -> Self {
        HealthService { directory_backend }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let db_status = self.check_database_status().await;

        let mut components = HashMap::new();
        components.insert("database".to_string(), health::database_component(&db_status));
        components.insert(
            "directory".to_string(),
            health::directory_component(self.directory_backend, &db_status),
        );
        components.insert("api".to_string(), DomainHealthComponent::healthy(None));

        SystemHealth::from_components(components)
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        health::check_database_status().await
    }
}

/// Factory function to create a health service
pub fn create_health_service(directory_backend: &'static str) -> SharedHealthService {
    Arc::new(HealthService::new(directory_backend))
}
