//! Authentication subsystem.
//!
//! Users are authenticated against an LDAP directory and receive a signed
//! access token that the `require_auth` middleware checks on every protected
//! request.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
pub mod ldap;
pub mod middleware;
pub mod settings;
pub mod token;

mod prelude;

use crate::prelude::*;

pub fn register_settings(
	registry: &mut credvault_core::settings::SettingsRegistry,
) -> ClResult<()> {
	settings::register_settings(registry)
}

// vim: ts=4
