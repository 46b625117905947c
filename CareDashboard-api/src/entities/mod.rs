// Public entities for the CareDashboard API
// This module contains data structures that are shared across the application boundary

// Error bodies
pub mod common;

// Directory records are passed through unchanged
pub use care_dashboard_domain::entities::{User, UserRole, Vhv};
