//! Domain layer health check functionality
//! This module provides health check services for the application

use care_dashboard_data::database;
use std::collections::HashMap;
use async_trait::async_trait;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced performance
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

impl HealthComponent {
    /// A healthy component
    pub fn healthy(details: Option<String>) -> Self {
        Self { status: ComponentStatus::Healthy, details }
    }
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Build a report whose overall status is the worst component status
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database
    /// Returns true if the database is healthy, false if not
    /// Returns an error if the check could not be performed
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Check if the database is available and functioning properly
///
/// Returns:
/// - Ok(true) if the database is fully operational
/// - Ok(false) if the database has degraded functionality
/// - Err if the database is completely unavailable
pub async fn check_database_status() -> Result<bool, String> {
    match database::get_connection_info() {
        Some(info) => Ok(info.contains("healthy")),
        None => match database::get_db_pool() {
            Ok(_) => Ok(true),
            Err(e) => Err(format!("Database connection error: {}", e)),
        },
    }
}

/// Map a database check result to a component
pub fn database_component(db_status: &Result<bool, String>) -> HealthComponent {
    match db_status {
        Ok(true) => HealthComponent::healthy(database::get_connection_info()),
        Ok(false) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Database is available but has performance issues".to_string()),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e.clone()),
        },
    }
}

/// Health of the directory client
///
/// The database-backed directory follows the database status; the remote
/// backend is reported by name only, since probing it would cost a request.
pub fn directory_component(backend_name: &str, db_status: &Result<bool, String>) -> HealthComponent {
    let details = Some(format!("backend: {}", backend_name));

    if backend_name != "database" {
        return HealthComponent::healthy(details);
    }

    match db_status {
        Ok(true) => HealthComponent::healthy(details),
        Ok(false) => HealthComponent { status: ComponentStatus::Degraded, details },
        // The repository falls back to in-memory storage without a pool
        Err(_) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(format!("backend: {} (in-memory fallback)", backend_name)),
        },
    }
}

/// Get overall system health without a directory client
pub async fn get_system_health() -> SystemHealth {
    let db_status = check_database_status().await;

    SystemHealth::from_components(
        vec![
            ("database".to_string(), database_component(&db_status)),
            ("api".to_string(), HealthComponent::healthy(None)),
        ].into_iter().collect(),
    )
}
