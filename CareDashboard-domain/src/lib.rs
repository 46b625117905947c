// CareDashboard Domain
// This crate contains the business logic for the CareDashboard application

// Directory clients consumed by the admin endpoints
pub mod services;

// Authentication
pub mod auth;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from the data crate for convenience
pub use care_dashboard_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
