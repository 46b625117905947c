use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use care_dashboard_data::repository::{DirectoryRepository, DirectoryRepositoryTrait, RepositoryError};
use crate::entities::conversions::{convert_to_domain_user, convert_to_domain_vhv};
use crate::entities::directory::{User, Vhv};

/// Directory service errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Repository error
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Transport failure talking to the remote directory
    #[error("HTTP error: {0}")]
    Http(String),

    /// Remote directory answered with a non-success status
    #[error("Directory returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode directory response: {0}")]
    Decode(String),

    /// Missing or invalid configuration
    #[error("Directory configuration error: {0}")]
    Config(String),
}

/// Trait for directory operations consumed by the admin endpoints
#[async_trait]
pub trait DirectoryServiceTrait {
    /// Get every user known to the directory
    async fn get_users(&self) -> Result<Vec<User>, DirectoryError>;

    /// Get every village health volunteer known to the directory
    async fn get_vhvs(&self) -> Result<Vec<Vhv>, DirectoryError>;

    /// Short description of the backing store for health reporting
    fn backend_name(&self) -> &'static str;
}

/// Directory service backed by a repository
pub struct DirectoryService<R: DirectoryRepositoryTrait> {
    repository: R,
}

impl<R: DirectoryRepositoryTrait> DirectoryService<R> {
    /// Create a new directory service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Access the underlying repository
    pub fn repository(&self) -> &R {
        &self.repository
    }
}

#[async_trait]
impl<R: DirectoryRepositoryTrait + Send + Sync> DirectoryServiceTrait for DirectoryService<R> {
    async fn get_users(&self) -> Result<Vec<User>, DirectoryError> {
        let records = self.repository.list_users().await?;
        debug!("Repository returned {} users", records.len());
        Ok(records.into_iter().map(convert_to_domain_user).collect())
    }

    async fn get_vhvs(&self) -> Result<Vec<Vhv>, DirectoryError> {
        let records = self.repository.list_vhvs().await?;
        debug!("Repository returned {} VHVs", records.len());
        Ok(records.into_iter().map(convert_to_domain_vhv).collect())
    }

    fn backend_name(&self) -> &'static str {
        "database"
    }
}

/// Create a repository-backed directory service
pub fn create_repository_directory_service() -> DirectoryService<DirectoryRepository> {
    DirectoryService::new(DirectoryRepository::new())
}
