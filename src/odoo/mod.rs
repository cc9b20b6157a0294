//! Odoo module
//!
//! JSON-RPC client and `hr.employee` mapping for Odoo's external API

pub mod client;
pub mod employee;
pub mod rpc;

pub use client::{OdooClient, OdooError};
pub use employee::{Address, Commune, Country, Employee, EmployeeService, ListQuery};
