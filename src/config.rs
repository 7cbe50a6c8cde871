//! Engine configuration
//!
//! Loaded from TOML. Every value has a default, so an empty document is a valid configuration.
//!
//! ```toml
//! [script]
//! max_source_bytes = 65536
//! max_steps = 100000
//! max_string_bytes = 1048576
//! max_depth = 128
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Bounds applied to every script run.
///
/// Scripts come from template definitions that may not be trusted, so their size, the amount
/// of work they may do, and the size of the strings they build are all capped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScriptLimits {
    /// Largest script source accepted, in bytes
    pub max_source_bytes: usize,
    /// Evaluation steps (one per expression evaluated) before the run is aborted
    pub max_steps: usize,
    /// Largest string value a script may produce, in bytes
    pub max_string_bytes: usize,
    /// Deepest expression nesting accepted, counted before parsing and again while evaluating
    pub max_depth: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_source_bytes: 64 * 1024,
            max_steps: 100_000,
            max_string_bytes: 1024 * 1024,
            max_depth: 128,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub script: ScriptLimits,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
