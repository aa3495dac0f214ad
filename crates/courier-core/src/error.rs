//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors produced by `courier-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
    Parse {
        latitude:  String,
        longitude: String,
        reason:    String,
    },
}

/// Shorthand result type for `courier-core`.
pub type CoreResult<T> = Result<T, CoreError>;
