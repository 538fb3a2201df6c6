//! Error Types
//!
//! The main error type [`Error`] covers every failure the loading side of the
//! engine can report:
//! - Asset I/O failures (missing or unreadable files)
//! - Clip and character decoding errors
//! - Retargeting failures ([`RetargetError`])
//!
//! Playback never fails: invalid play requests are logged and ignored, see
//! [`PlaybackController::play`](crate::playback::PlaybackController::play).
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`.

use thiserror::Error;

use crate::retarget::RetargetError;

#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A clip decoded but its contents are inconsistent.
    #[error("Invalid clip `{clip}`: {reason}")]
    InvalidClip {
        /// Clip name or locator
        clip: String,
        /// What was wrong with it
        reason: String,
    },

    /// A character description decoded but cannot be built.
    #[error("Invalid character: {0}")]
    InvalidCharacter(String),

    // ========================================================================
    // Retargeting Errors
    // ========================================================================
    #[error("Retarget error: {0}")]
    Retarget(#[from] RetargetError),

    // ========================================================================
    // Async & Threading Errors
    // ========================================================================
    /// Task join error (a blocking decode task panicked or was cancelled).
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskJoin(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
