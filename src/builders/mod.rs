//! Builders
//!
//! Fluent builders for client configuration.

pub mod config;

pub use config::{bullhorn_config, BullhornConfigBuilder};
