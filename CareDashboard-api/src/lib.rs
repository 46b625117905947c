// CareDashboard-api lib.rs
//
// Admin JSON endpoints, role dashboards and the server configuration.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
pub mod pages;
