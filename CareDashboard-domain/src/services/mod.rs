pub mod directory;

#[cfg(feature = "with-supabase")]
pub mod supabase;

// Domain services
// This module contains the directory client implementations.

use std::env;
use std::sync::Arc;
use tracing::info;

// Re-export service traits and factory functions
pub use directory::{
    create_repository_directory_service, DirectoryError, DirectoryService, DirectoryServiceTrait,
};

#[cfg(feature = "with-supabase")]
pub use supabase::{SupabaseConfig, SupabaseDirectoryClient};

/// Shared handle to whichever directory client is configured
pub type SharedDirectoryService = Arc<dyn DirectoryServiceTrait + Send + Sync>;

/// Backend selected for the directory client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryBackend {
    /// Read from the application database
    Database,
    /// Read from a Supabase project over REST
    Supabase,
}

impl DirectoryBackend {
    /// Resolve the backend from `DIRECTORY_BACKEND`, defaulting to Supabase
    /// when `SUPABASE_URL` is set and to the database otherwise
    pub fn from_env() -> Result<Self, DirectoryError> {
        match env::var("DIRECTORY_BACKEND") {
            Ok(value) => match value.to_lowercase().as_str() {
                "database" | "db" => Ok(DirectoryBackend::Database),
                "supabase" => Ok(DirectoryBackend::Supabase),
                other => Err(DirectoryError::Config(format!("Unknown DIRECTORY_BACKEND: {}", other))),
            },
            Err(_) if env::var("SUPABASE_URL").is_ok() => Ok(DirectoryBackend::Supabase),
            Err(_) => Ok(DirectoryBackend::Database),
        }
    }
}

/// Create the directory service selected by the environment
pub fn create_default_directory_service() -> Result<SharedDirectoryService, DirectoryError> {
    let backend = DirectoryBackend::from_env()?;
    info!("Using {:?} directory backend", backend);

    match backend {
        DirectoryBackend::Database => Ok(Arc::new(create_repository_directory_service())),
        #[cfg(feature = "with-supabase")]
        DirectoryBackend::Supabase => Ok(Arc::new(SupabaseDirectoryClient::from_env()?)),
        #[cfg(not(feature = "with-supabase"))]
        DirectoryBackend::Supabase => Err(DirectoryError::Config(
            "Supabase backend requires the with-supabase feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection_from_env() {
        env::remove_var("SUPABASE_URL");
        env::remove_var("DIRECTORY_BACKEND");
        assert_eq!(DirectoryBackend::from_env().unwrap(), DirectoryBackend::Database);

        env::set_var("SUPABASE_URL", "https://project.supabase.co");
        assert_eq!(DirectoryBackend::from_env().unwrap(), DirectoryBackend::Supabase);

        env::set_var("DIRECTORY_BACKEND", "db");
        assert_eq!(DirectoryBackend::from_env().unwrap(), DirectoryBackend::Database);

        let service = create_default_directory_service().unwrap();
        assert_eq!(service.backend_name(), "database");

        env::set_var("DIRECTORY_BACKEND", "ldap");
        assert!(matches!(DirectoryBackend::from_env(), Err(DirectoryError::Config(_))));

        env::remove_var("DIRECTORY_BACKEND");
        env::remove_var("SUPABASE_URL");
    }
}
