use crate::error::Error;

/// Result type alias used throughout the setld crates.
pub type Result<T> = std::result::Result<T, Error>;
