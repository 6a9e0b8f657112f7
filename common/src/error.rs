//! Error types for the shared core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// User-facing validation message; no state was changed.
    #[error("{0}")]
    Validation(String),

    #[error("No active scene. Create or switch to a scene first.")]
    NoActiveScene,

    #[error("Scene not found: {0}")]
    UnknownScene(String),

    #[error("Firefighter not found: {0}")]
    UnknownFirefighter(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;
