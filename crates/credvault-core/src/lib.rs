//! Core infrastructure for credvault.
//!
//! Application state, the settings subsystem, request extractors and the
//! small stand-alone helpers (password generator, temp dir probing, the
//! application lock file, upload checks, outgoing HTTP) that feature crates
//! build on.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod app_info;
pub mod core_settings;
pub mod eta;
pub mod extensions;
pub mod extract;
pub mod lock;
pub mod password;
pub mod prelude;
pub mod request;
pub mod settings;
pub mod tmp_dir;
pub mod upload;

pub use app::{App, AppBuilderOpts, AppState};
pub use extract::{Admin, Auth, AuthCtx, OptionalAuth};

pub fn register_settings(
	registry: &mut settings::SettingsRegistry,
) -> credvault_types::error::ClResult<()> {
	core_settings::register_settings(registry)
}

// vim: ts=4
