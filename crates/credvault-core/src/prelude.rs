pub use crate::app::App;
pub use credvault_types::prelude::*;

// vim: ts=4
