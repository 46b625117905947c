// Storage models for directory records
pub mod directory;

pub use directory::{UserRecord, VhvRecord};
