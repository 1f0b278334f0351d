use crate::error::{Result, ScoreAugError};
use crate::padding::{DEFAULT_PADDING_LENGTH, MAX_PADDING_LENGTH};
use crate::utils::files::DEFAULT_PAGE_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Construction parameters for [`crate::ScoreAug`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAugConfig {
    /// Directory holding `seamless/` and `seamed/` page folders
    pub blank_pages_path: PathBuf,

    /// Pixels added to each axis when a seamed page needs extra canvas
    #[serde(default = "default_padding_length")]
    pub padding_length: u32,

    /// File extensions accepted as blank pages
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Let the drawn contrast/brightness/blur gates suppress their effect.
    /// Off by default: every effect is applied.
    #[serde(default)]
    pub honor_gates: bool,
}

fn default_padding_length() -> u32 {
    DEFAULT_PADDING_LENGTH
}

fn default_extensions() -> Vec<String> {
    DEFAULT_PAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl ScoreAugConfig {
    pub fn new(blank_pages_path: impl Into<PathBuf>) -> Self {
        ScoreAugConfig {
            blank_pages_path: blank_pages_path.into(),
            padding_length: default_padding_length(),
            extensions: default_extensions(),
            honor_gates: false,
        }
    }

    pub fn with_padding_length(mut self, padding_length: u32) -> Self {
        self.padding_length = padding_length;
        self
    }

    pub fn with_honor_gates(mut self, honor_gates: bool) -> Self {
        self.honor_gates = honor_gates;
        self
    }

    /// Read a JSON config file; call [`Self::validate`] once overrides are applied
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.padding_length == 0 {
            return Err(ScoreAugError::InvalidConfig(
                "padding_length must be positive".into(),
            ));
        }
        if self.padding_length > MAX_PADDING_LENGTH {
            return Err(ScoreAugError::InvalidConfig(format!(
                "padding_length {} exceeds {}",
                self.padding_length, MAX_PADDING_LENGTH
            )));
        }
        if self.extensions.is_empty() {
            return Err(ScoreAugError::InvalidConfig(
                "at least one page extension is required".into(),
            ));
        }
        Ok(())
    }
}
