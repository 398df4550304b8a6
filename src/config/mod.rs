/// Database configuration and connection management
pub mod database;

/// Catalog seed loading from config.toml
pub mod catalog;

/// Payment gateway credentials from environment variables
pub mod payment;
