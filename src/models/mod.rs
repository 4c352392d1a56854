// src/models/mod.rs

//! Domain models for the notifier.

mod config;
mod row;

// Re-export all public types
pub use config::{Config, EmailConfig, FilterConfig, PortalConfig, StorageConfig};
pub use row::NotificationRow;
