pub use crate::error::{ClResult, Error};
pub use crate::types::{ItemId, Patch, Timestamp};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
