//! Configuration module
//!
//! Loads gateway settings from `.env`, an optional TOML file and the process
//! environment.

#[allow(clippy::module_inception)]
pub mod config;

pub use config::{Config, ConfigError, OdooConfig, ServerConfig};
