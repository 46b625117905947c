pub mod admin;
pub mod dashboard;
pub mod health;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use admin::{get_users, get_vhvs};
pub use dashboard::{doctor_dashboard, patient_dashboard, vhv_dashboard};
pub use health::health_check;
