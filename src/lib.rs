//! Odoo Employee Gateway Library
//!
//! Thin REST gateway over Odoo's JSON-RPC API.
//! Exposes `hr.employee` records as typed JSON.

pub mod config;
pub mod odoo;
pub mod server;

pub use config::{Config, ConfigError, OdooConfig, ServerConfig};
pub use odoo::{Employee, EmployeeService, OdooClient, OdooError};
pub use server::{build_router, serve, AppState};
