//! Configuration loader
//!
//! Loads parser limits from a YAML file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use super::ParserLimits;

/// Environment variable naming a YAML limits file
pub const CONFIG_ENV_VAR: &str = "DDL_PARSER_CONFIG";

pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(config_path.into()),
        }
    }

    /// Create loader from the DDL_PARSER_CONFIG env var
    ///
    /// When the variable is unset the loader yields default limits.
    pub fn from_env() -> Self {
        Self {
            config_path: std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        }
    }

    /// Get the configured file path, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load and validate limits
    pub fn load(&self) -> Result<ParserLimits> {
        let Some(path) = &self.config_path else {
            info!("No parser config file set, using default limits");
            return Ok(ParserLimits::default());
        };

        info!("Loading parser limits from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let limits = ParserLimits::from_yaml_str(&content)
            .with_context(|| format!("Invalid limits in {}", path.display()))?;

        info!(
            "Loaded limits: max_dimensions={}, max_repeat={}",
            limits.max_dimensions, limits.max_repeat
        );

        Ok(limits)
    }
}
