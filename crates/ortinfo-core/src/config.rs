//! Conversion settings. Defaults match what model producers emit today; a JSON
//! file with any subset of the fields can override them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DENOTATION_SUFFIX: &str = ".denotation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Metadata key for a feature's denotation is `<feature name><suffix>`.
    pub denotation_key_suffix: String,
    /// Attach `Image.*` metadata to features denoted as images.
    pub read_image_properties: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            denotation_key_suffix: DEFAULT_DENOTATION_SUFFIX.to_string(),
            read_image_properties: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ConverterConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    #[inline]
    pub fn denotation_key(&self, feature: &str) -> String {
        format!("{feature}{}", self.denotation_key_suffix)
    }
}
