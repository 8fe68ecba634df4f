//! Stack configuration
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! features_dir = "features"
//! notes_ref = "refs/notes/specnote"
//! snapshot_key = "snapshots"
//! snapshot_entry = "snapshot"
//! ```

use crate::error::StackError;
use serde::{Deserialize, Serialize};
use specnote_store::DEFAULT_NOTES_REF;
use std::path::{Path, PathBuf};

/// Settings for a [`SpecStack`](crate::SpecStack)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Root of the specification tree
    pub features_dir: PathBuf,
    /// Git notes ref metadata is stored under
    pub notes_ref: String,
    /// Literal whose content address holds persisted snapshots
    pub snapshot_key: String,
    /// Metadata name of a persisted snapshot
    pub snapshot_entry: String,
}

impl StackConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_features_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.features_dir = dir.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_notes_ref(mut self, notes_ref: impl Into<String>) -> Self {
        self.notes_ref = notes_ref.into();
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`StackError::Config`] if the text is not valid configuration
    pub fn from_toml_str(text: &str) -> Result<Self, StackError> {
        toml::from_str(text).map_err(|e| StackError::Config(e.to_string()))
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// Returns [`StackError::Config`] if the file is missing or invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StackError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StackError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            features_dir: PathBuf::from("features"),
            notes_ref: DEFAULT_NOTES_REF.to_string(),
            snapshot_key: "snapshots".to_string(),
            snapshot_entry: "snapshot".to_string(),
        }
    }
}
