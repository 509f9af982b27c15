//! Shared types, adapter traits, and core utilities for credvault.
//!
//! The crate holds everything that both the feature crates and the storage
//! adapters need to agree on, so adapters compile without pulling in the web
//! layer.

pub mod directory_adapter;
pub mod error;
pub mod meta_adapter;
pub mod prelude;
pub mod types;
pub mod utils;

// vim: ts=4
