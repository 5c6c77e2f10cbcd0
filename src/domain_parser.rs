//! Limit-checked parsing
//!
//! [`DomainParser`] runs both phases like [`parse_domain`](crate::parse_domain)
//! but refuses inputs whose expansion would exceed the configured
//! [`ParserLimits`], before any expanded text is allocated.

use thiserror::Error;
use tracing::{debug, warn};

use crate::ast::DomainSequence;
use crate::config::ParserLimits;
use crate::diagnostics::SyntaxError;
use crate::expander::{expanded_len, render, segments};
use crate::parser::parse;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Repeat count {repeat} at position {offset} exceeds the limit of {limit}")]
    RepeatTooLarge { offset: usize, repeat: u32, limit: u32 },

    #[error("Domain string expands to {requested} dimensions, limit is {limit}")]
    TooManyDimensions { requested: u64, limit: usize },
}

// =============================================================================
// PARSER
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct DomainParser {
    limits: ParserLimits,
}

impl DomainParser {
    pub fn new(limits: ParserLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ParserLimits {
        &self.limits
    }

    /// Expand and interpret `input`, enforcing the configured limits
    pub fn parse(&self, input: &str) -> Result<DomainSequence, DomainError> {
        let segments = segments(input)?;

        if let Some(seg) = segments.iter().find(|s| s.repeat > self.limits.max_repeat) {
            warn!(
                repeat = seg.repeat,
                limit = self.limits.max_repeat,
                "rejecting domain string"
            );
            return Err(DomainError::RepeatTooLarge {
                offset: seg.offset,
                repeat: seg.repeat,
                limit: self.limits.max_repeat,
            });
        }

        let requested = expanded_len(&segments);
        if requested > self.limits.max_dimensions as u64 {
            warn!(
                requested,
                limit = self.limits.max_dimensions,
                "rejecting domain string"
            );
            return Err(DomainError::TooManyDimensions {
                requested,
                limit: self.limits.max_dimensions,
            });
        }

        let expanded = render(&segments);
        debug!(input, expanded = %expanded, "expanded domain string");
        Ok(parse(&expanded)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
