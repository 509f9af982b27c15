pub use credvault_core::prelude::*;

// vim: ts=4
