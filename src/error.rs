//! Error types for the age sorter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for age sorter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the age sorter
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read photo source {source_id}: {message}")]
    UnreadableSource { source_id: String, message: String },

    #[error("Failed to write {path}: {message}")]
    DestinationWrite { path: PathBuf, message: String },

    #[error("Failed to register {path} with the media index: {message}")]
    Registration { path: PathBuf, message: String },

    #[error("Invalid precondition: {0}")]
    InvalidPrecondition(String),

    #[error("Batch cancelled before this photo was processed")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read EXIF data from {path}: {message}")]
    ExifRead { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
