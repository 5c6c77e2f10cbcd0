//! Parser configuration
//!
//! Limits that guard the limit-checked [`DomainParser`](crate::DomainParser)
//! against DDL strings that expand to unreasonably many dimensions
//! (`R^4000000000` is only a dozen bytes).

pub mod loader;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Default cap on the total number of dimensions after expansion
pub const DEFAULT_MAX_DIMENSIONS: usize = 10_000;

/// Default cap on a single `^N` repeat count
pub const DEFAULT_MAX_REPEAT: u32 = 10_000;

/// Size limits applied before a DDL string is expanded
///
/// ```yaml
/// max_dimensions: 500
/// max_repeat: 100
/// ```
///
/// Missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserLimits {
    pub max_dimensions: usize,
    pub max_repeat: u32,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            max_dimensions: DEFAULT_MAX_DIMENSIONS,
            max_repeat: DEFAULT_MAX_REPEAT,
        }
    }
}

impl ParserLimits {
    /// Parse and validate limits from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let limits: ParserLimits =
            serde_yaml::from_str(yaml).context("Failed to parse parser limits")?;
        limits.validate()?;
        Ok(limits)
    }

    /// Both limits must allow at least one dimension
    pub fn validate(&self) -> Result<()> {
        if self.max_dimensions == 0 {
            return Err(anyhow!("max_dimensions must be at least 1"));
        }
        if self.max_repeat == 0 {
            return Err(anyhow!("max_repeat must be at least 1"));
        }
        Ok(())
    }
}
