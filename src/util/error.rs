//! Error types for the exporter.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export, encode and decode operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input file does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// No target collection selected in the export settings
    #[error("Please choose a collection first")]
    NoTargetCollection,

    /// Named collection does not exist in the scene
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Export settings failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Frame range is inverted
    #[error("Invalid frame range: start {start} is after end {end}")]
    InvalidFrameRange { start: u32, end: u32 },

    /// Binary artifact is truncated
    #[error("Unexpected end of data at byte {0}")]
    UnexpectedEof(u64),

    /// Decoded data does not match its declared layout
    #[error("Invalid data structure: {0}")]
    InvalidStructure(String),

    /// File extension does not name a known data format
    #[error("Unknown data format for {0}")]
    UnknownFormat(PathBuf),

    /// Texture file could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error was raised before any work started.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::NoTargetCollection | Self::CollectionNotFound(_) | Self::InvalidConfig(_)
        )
    }
}

/// Result type alias for exporter operations.
pub type Result<T> = std::result::Result<T, Error>;
