//! Error types for the gif_load_state library.
//!
//! Reading and writing the flag never fails. These errors only come from
//! the surrounding helpers: option validation, bounded waits and loaders.

use thiserror::Error;

/// Main error type for gif_load_state operations.
#[derive(Error, Debug)]
pub enum LoadStateError {
    /// Invalid holder options
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bounded wait elapsed before the library reported as loaded
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Status channel closed while waiting
    #[error("Channel closed")]
    ChannelClosed,

    /// The external loader reported a failure
    #[error("Loader error: {0}")]
    Loader(String),
}

/// Result type alias using LoadStateError
pub type Result<T> = std::result::Result<T, LoadStateError>;

impl From<tokio::time::error::Elapsed> for LoadStateError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        LoadStateError::Timeout(err.to_string())
    }
}
