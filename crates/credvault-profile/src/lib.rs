//! User profile management.
//!
//! A profile is a named set of permission flags assigned to users.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
pub mod service;

mod prelude;

pub use service::ProfileService;

// vim: ts=4
