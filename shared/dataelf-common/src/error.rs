//! Common error types.

use thiserror::Error;

/// Errors raised while handling shared account data.
#[derive(Debug, Error)]
pub enum Error {
    /// A user record could not be read.
    #[error("Invalid user record: {0}")]
    InvalidUser(#[from] serde_json::Error),

    /// A stored enum value is not recognised.
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Result alias using the common [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
