// Repository module structure
pub mod errors;
mod directory;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use directory::{DirectoryRepository, DirectoryRepositoryTrait};
pub use in_memory::InMemoryStorage;
