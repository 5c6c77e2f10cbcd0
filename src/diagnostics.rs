//! Syntax diagnostics for both parsing phases
//!
//! Every failure in expansion or interpretation becomes a [`SyntaxError`]
//! pointing at the first offending byte, with a description of what the
//! grammar expected there. `render` produces a caret diagnostic for display.

use nom::error::{VerboseError, VerboseErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which phase rejected the input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// `^N` expansion over the raw DDL string
    Expansion,
    /// Domain interpretation over the expanded string
    Interpretation,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Expansion => f.write_str("expansion"),
            Phase::Interpretation => f.write_str("interpretation"),
        }
    }
}

/// A DDL string that no grammar alternative matches
///
/// `offset` is a byte offset into the input of the failing phase: the raw
/// string for [`Phase::Expansion`], the expanded string for
/// [`Phase::Interpretation`].
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{phase} failed at position {offset}: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub phase: Phase,
    pub offset: usize,
    pub expected: String,
    pub found: String,
}

impl SyntaxError {
    pub fn new(phase: Phase, source: &str, offset: usize, expected: impl Into<String>) -> Self {
        let offset = offset.min(source.len());
        Self {
            phase,
            offset,
            expected: expected.into(),
            found: describe_found(&source[offset..]),
        }
    }

    /// Build from a nom error chain
    ///
    /// The first entry of the chain is the innermost failure and fixes the
    /// position. The description is taken from the innermost context label
    /// attached at that same position, falling back to the expected
    /// character and then the nom error kind.
    pub(crate) fn from_verbose(phase: Phase, source: &str, err: VerboseError<&str>) -> Self {
        let Some((fragment, first_kind)) = err.errors.first() else {
            return Self::new(phase, source, 0, "valid input");
        };
        let offset = source.len() - fragment.len();

        let label = err.errors.iter().find_map(|(frag, kind)| match kind {
            VerboseErrorKind::Context(ctx) if frag.len() == fragment.len() => Some(*ctx),
            _ => None,
        });

        let expected = match (label, first_kind) {
            (Some(ctx), _) => ctx.to_string(),
            (None, VerboseErrorKind::Char(c)) => format!("'{}'", c),
            (None, VerboseErrorKind::Context(ctx)) => ctx.to_string(),
            (None, VerboseErrorKind::Nom(kind)) => kind.description().to_lowercase(),
        };

        Self::new(phase, source, offset, expected)
    }

    /// Line and column (both 1-based) of the failure within `source`
    pub fn line_col(&self, source: &str) -> (u32, u32) {
        byte_to_line_col(source, self.offset)
    }

    /// Render a caret diagnostic against the text the failing phase saw
    ///
    /// ```text
    /// interpretation failed at position 5: expected closing parenthesis, found end of input
    ///   at line 1, column 6:
    ///   R(1:2
    ///        ^
    /// ```
    pub fn render(&self, source: &str) -> String {
        let (line_no, col) = self.line_col(source);
        let line = source.lines().nth(line_no as usize - 1).unwrap_or("");
        format!(
            "{}\n  at line {}, column {}:\n  {}\n  {}^",
            self,
            line_no,
            col,
            line,
            " ".repeat(col as usize - 1)
        )
    }
}

fn describe_found(rest: &str) -> String {
    match rest.chars().next() {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}

/// Convert byte offset to line and column
fn byte_to_line_col(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

// =============================================================================
// Tests
// =============================================================================
