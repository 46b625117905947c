// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use care_dashboard_data::repository::{InMemoryStorage, RepositoryError};
use serde_json::Map;

use crate::entities::conversions::{convert_to_data_user, convert_to_data_vhv};
use crate::entities::directory::{User, Vhv};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth};
use crate::services::{DirectoryError, DirectoryServiceTrait, SharedDirectoryService};

/// Mock implementation of the DirectoryServiceTrait for testing
#[derive(Debug, Default, Clone)]
pub struct MockDirectoryService {
    users: Vec<User>,
    vhvs: Vec<Vhv>,
    should_fail_users: bool,
    should_fail_vhvs: bool,
}

impl MockDirectoryService {
    /// Create an empty mock directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail listing users
    pub fn with_users_failure(mut self) -> Self {
        self.should_fail_users = true;
        self
    }

    /// Configure the mock to fail listing volunteers
    pub fn with_vhvs_failure(mut self) -> Self {
        self.should_fail_vhvs = true;
        self
    }

    /// Seed users returned by `get_users`
    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users.extend(users);
        self
    }

    /// Seed volunteers returned by `get_vhvs`
    pub fn with_vhvs(mut self, vhvs: Vec<Vhv>) -> Self {
        self.vhvs.extend(vhvs);
        self
    }
}

#[async_trait]
impl DirectoryServiceTrait for MockDirectoryService {
    async fn get_users(&self) -> Result<Vec<User>, DirectoryError> {
        if self.should_fail_users {
            return Err(DirectoryError::Http(
                "Connection refused - mock is configured to fail".to_string(),
            ));
        }
        Ok(self.users.clone())
    }

    async fn get_vhvs(&self) -> Result<Vec<Vhv>, DirectoryError> {
        if self.should_fail_vhvs {
            return Err(DirectoryError::Http(
                "Connection refused - mock is configured to fail".to_string(),
            ));
        }
        Ok(self.vhvs.clone())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

/// Build in-memory storage holding the given records
pub fn seeded_storage(users: &[User], vhvs: &[Vhv]) -> Result<InMemoryStorage, RepositoryError> {
    let storage = InMemoryStorage::new();
    for user in users {
        storage.insert_user(convert_to_data_user(user))?;
    }
    for vhv in vhvs {
        storage.insert_vhv(convert_to_data_vhv(vhv))?;
    }
    Ok(storage)
}

/// Sample user with the given id and role
pub fn sample_user(id: &str, role: &str) -> User {
    User {
        id: id.to_string(),
        email: Some(format!("{}@example.org", id)),
        full_name: Some(format!("User {}", id)),
        role: role.to_string(),
        phone: None,
        created_at: Some("2024-01-15T08:30:00Z".to_string()),
        extra: Map::new(),
    }
}

/// Sample volunteer with the given id
pub fn sample_vhv(id: &str) -> Vhv {
    Vhv {
        id: id.to_string(),
        user_id: None,
        full_name: Some(format!("Volunteer {}", id)),
        phone: Some("+66 81 234 5678".to_string()),
        village: Some("Ban Nong Bua".to_string()),
        district: Some("Mueang".to_string()),
        status: Some("active".to_string()),
        created_at: Some("2024-02-01T10:00:00Z".to_string()),
        extra: Map::new(),
    }
}

/// Mock implementation of the HealthServiceTrait for testing
#[derive(Debug, Clone)]
pub struct MockHealthService {
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// A service reporting every component healthy
    pub fn new() -> Self {
        let components = ["database", "directory", "api"]
            .iter()
            .map(|name| (name.to_string(), HealthComponent::healthy(None)))
            .collect();

        Self { components }
    }

    /// Override one component
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components.insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        SystemHealth::from_components(self.components.clone())
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        match self.components.get("database").map(|c| &c.status) {
            Some(ComponentStatus::Unhealthy) => Err("Database connection failed".to_string()),
            Some(ComponentStatus::Degraded) => Ok(false),
            _ => Ok(true),
        }
    }
}

/// Create a shared mock directory service
pub fn create_mock_directory_service(mock: MockDirectoryService) -> SharedDirectoryService {
    Arc::new(mock)
}

/// Create a mock health service that reports healthy
pub fn create_mock_health_service() -> MockHealthService {
    MockHealthService::new()
}
