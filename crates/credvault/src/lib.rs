//! credvault is a self-hosted password manager for system administrators.
//!
//! # Features
//!
//! - LDAP authentication with group membership checks
//! - Permission profiles and user groups
//! - Account import from CSV files
//! - Random password generation
//! - Maintenance lock

// Re-export shared types and adapter traits from credvault-types
pub use credvault_types::directory_adapter;
pub use credvault_types::error;
pub use credvault_types::meta_adapter;
pub use credvault_types::types;
pub use credvault_types::utils;

// Feature crate re-exports
pub use credvault_auth as auth;
pub use credvault_core::settings;
pub use credvault_grid as grid;
pub use credvault_import as import;
pub use credvault_profile as profile;

// Local modules
pub mod app;
pub mod handler;
pub mod prelude;
pub mod routes;
pub mod webserver;

pub use crate::app::{App, AppBuilder};

// vim: ts=4
