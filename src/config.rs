//! Export settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codec::DataFormat;
use crate::sampler::ExportMode;
use crate::util::{Error, Result};

/// Default base name of the written artifact.
pub const DEFAULT_FILENAME: &str = "file_name";

/// Everything one export run needs besides the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    // Source
    pub target_collection: Option<String>,
    pub export_mode: ExportMode,

    // Decimation (vertex mode only)
    pub decimation_ratio: f32,
    pub keep_decimated_collection: bool,

    // Output
    pub data_format: DataFormat,
    pub save_filepath: PathBuf,
    pub save_filename: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            target_collection: None,
            export_mode: ExportMode::ObjectLocation,
            decimation_ratio: 1.0,
            keep_decimated_collection: false,
            data_format: DataFormat::Json,
            save_filepath: default_output_dir(),
            save_filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

/// The user's download directory, or the current directory.
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl ExportSettings {
    /// Settings exporting `collection` with everything else at its default.
    pub fn for_collection(collection: impl Into<String>) -> Self {
        Self { target_collection: Some(collection.into()), ..Default::default() }
    }

    /// Load settings from a JSON file; missing fields take their defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save settings as pretty JSON.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check the settings before any work starts.
    pub fn validate(&self) -> Result<()> {
        match self.target_collection.as_deref() {
            None | Some("") => return Err(Error::NoTargetCollection),
            Some(_) => {}
        }
        if !self.decimation_ratio.is_finite() || !(0.0..=1.0).contains(&self.decimation_ratio) {
            return Err(Error::config(format!(
                "decimation_ratio must be within [0, 1], got {}",
                self.decimation_ratio
            )));
        }
        if self.save_filename.trim().is_empty() {
            return Err(Error::config("save_filename is empty"));
        }
        Ok(())
    }

    /// Whether this run goes through a decimated duplicate.
    pub fn wants_decimation(&self) -> bool {
        self.export_mode == ExportMode::VerticesLocation && self.decimation_ratio < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = ExportSettings::default();
        assert_eq!(s.target_collection, None);
        assert_eq!(s.export_mode, ExportMode::ObjectLocation);
        assert_eq!(s.decimation_ratio, 1.0);
        assert!(!s.keep_decimated_collection);
        assert_eq!(s.data_format, DataFormat::Json);
        assert_eq!(s.save_filename, "file_name");
        assert!(!s.save_filepath.as_os_str().is_empty());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: ExportSettings = serde_json::from_str(
            r#"{"target_collection": "Drones", "export_mode": "VERTICES_LOCATION", "data_format": "BINARY"}"#,
        )
        .unwrap();
        assert_eq!(s.target_collection.as_deref(), Some("Drones"));
        assert_eq!(s.export_mode, ExportMode::VerticesLocation);
        assert_eq!(s.data_format, DataFormat::Binary);
        assert_eq!(s.decimation_ratio, 1.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut s = ExportSettings::for_collection("Swarm");
        s.decimation_ratio = 0.25;
        s.save_filepath = dir.path().to_path_buf();
        s.save_to(&path).unwrap();
        assert_eq!(ExportSettings::load_from(&path).unwrap(), s);
    }

    #[test]
    fn test_validate() {
        assert!(matches!(ExportSettings::default().validate(), Err(Error::NoTargetCollection)));

        let mut s = ExportSettings::for_collection("C");
        assert!(s.validate().is_ok());

        s.decimation_ratio = 1.5;
        assert!(matches!(s.validate(), Err(Error::InvalidConfig(_))));
        s.decimation_ratio = f32::NAN;
        assert!(s.validate().is_err());
        s.decimation_ratio = 0.0;
        assert!(s.validate().is_ok());

        s.save_filename = "  ".into();
        assert!(s.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_wants_decimation() {
        let mut s = ExportSettings::for_collection("C");
        s.decimation_ratio = 0.5;
        assert!(!s.wants_decimation());
        s.export_mode = ExportMode::VerticesLocation;
        assert!(s.wants_decimation());
        s.decimation_ratio = 1.0;
        assert!(!s.wants_decimation());
    }
}
