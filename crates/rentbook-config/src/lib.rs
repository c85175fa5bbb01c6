//! rentbook-config
//!
//! Persistent settings for the rent book: locale, currency, electricity unit rate,
//! the billing period treated as "now", and where data lives on disk.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{resolve_base_dir, ConfigManager, HOME_ENV};
pub use model::Config;
