//! Data grids for the management pages and the user group subsystem behind
//! the group grid.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod data_grid;
pub mod group;
pub mod handler;
pub mod user_group_grid;

mod prelude;

pub use user_group_grid::UserGroupGrid;

// vim: ts=4
