//! Account import.
//!
//! Accounts are imported from delimited text files, creating the referenced
//! customers and categories on the fly.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod csv_import;
pub mod handler;
pub mod settings;

mod prelude;

pub use csv_import::{CsvImport, ImportError, ImportResult};

use crate::prelude::*;

pub fn register_settings(
	registry: &mut credvault_core::settings::SettingsRegistry,
) -> ClResult<()> {
	settings::register_settings(registry)
}

// vim: ts=4
