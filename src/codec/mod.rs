//! Track collection serialization.
//!
//! Two equivalent encodings:
//! - [`json`] - pretty-printed JSON with 4-space indentation
//! - [`binary`] - packed little-endian records, no header, no padding
//!
//! [`file`] writes and reads artifacts on disk.

pub mod binary;
pub mod file;
pub mod json;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::TrackCollection;
use crate::util::{Error, Result};

pub use binary::{encoded_len, KEYFRAME_RECORD_SIZE};
pub use file::{load_from_file, save_to_file};

/// Output encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataFormat {
    #[default]
    Json,
    Binary,
}

impl DataFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "bin",
        }
    }

    /// Parse a format name (`json`, `binary`, `bin`), case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "binary" | "bin" => Some(Self::Binary),
            _ => None,
        }
    }

    /// Infer the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("bin") => Ok(Self::Binary),
            _ => Err(Error::UnknownFormat(path.to_path_buf())),
        }
    }
}

/// Encode a collection in the given format.
pub fn encode(collection: &TrackCollection, format: DataFormat) -> Result<Vec<u8>> {
    match format {
        DataFormat::Json => json::encode(collection),
        DataFormat::Binary => Ok(binary::encode(collection)),
    }
}

/// Decode a collection from bytes in the given format.
pub fn decode(bytes: &[u8], format: DataFormat) -> Result<TrackCollection> {
    match format {
        DataFormat::Json => json::decode(bytes),
        DataFormat::Binary => binary::decode(bytes),
    }
}
