//! Editor tunables.

use crate::history::MAX_HISTORY_LENGTH;
use crate::snap::SNAP_THRESHOLD;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors reading an editor config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Knobs the editing engine reads. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum undo snapshots kept.
    pub max_history: usize,
    /// Snap distance in canvas units.
    pub snap_threshold: f64,
    /// Offset applied to a duplicated node.
    pub duplicate_offset: Vec2,
    /// Offset applied to pasted nodes.
    pub paste_offset: Vec2,
    /// Minimum relative y of a child inside a group, below its header.
    pub group_header_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY_LENGTH,
            snap_threshold: SNAP_THRESHOLD,
            duplicate_offset: Vec2::new(20.0, 20.0),
            paste_offset: Vec2::new(30.0, 30.0),
            group_header_height: 30.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "snapThreshold": 4, "maxHistory": 10 }"#).unwrap();
        assert_eq!(config.snap_threshold, 4.0);
        assert_eq!(config.max_history, 10);
        assert_eq!(config.paste_offset, Vec2::new(30.0, 30.0));
        assert_eq!(config.group_header_height, 30.0);
    }

    #[test]
    fn test_offsets_parse_as_vectors() {
        let config = EditorConfig::from_json(r#"{ "duplicateOffset": { "x": 5, "y": 6 } }"#).unwrap();
        assert_eq!(config.duplicate_offset, Vec2::new(5.0, 6.0));
    }

    #[test]
    fn test_bad_config_is_parse_error() {
        let err = EditorConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::from_json_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawit.json");
        std::fs::write(&path, r#"{ "maxHistory": 5 }"#).unwrap();
        let config = EditorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_history, 5);
    }
}
