// CareDashboard Data
// This crate handles database access and storage for directory records

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
