// Domain entities and value objects
pub mod directory;
pub mod conversions;

// Re-export common types for easier imports
pub use directory::{User, UserRole, Vhv};
