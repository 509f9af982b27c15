pub use credvault_core::prelude::*;
