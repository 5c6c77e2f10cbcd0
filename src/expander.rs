//! `^N` expansion
//!
//! First phase of DDL processing. The raw string is split into
//! comma-separated segments; a segment with a trailing `^N` is repeated `N`
//! times. Everything else passes through untouched, so `R(-10:10)^3,T`
//! expands to `R(-10:10),R(-10:10),R(-10:10),T`.
//!
//! ```text
//! expansion := segment ("," segment)*
//! segment   := [RBZT():\-0-9.]+ ("^" count)?
//! count     := [1-9] [0-9]*
//! ```

use nom::{
    bytes::complete::is_a,
    character::complete::{char, digit0, one_of},
    combinator::{cut, opt, recognize},
    error::{context, ContextError, ErrorKind, ParseError as NomParseError, VerboseError},
    sequence::{pair, preceded},
    IResult,
};
use tracing::trace;

use crate::diagnostics::{Phase, SyntaxError};

/// Characters a segment may contain (everything in the DDL alphabet but `,` and `^`)
const SEGMENT_ALPHABET: &str = "RBZT():-0123456789.";

/// One comma-separated piece of a raw DDL string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Segment text without the `^N` suffix
    pub text: &'a str,
    /// Number of copies to emit; 1 when no `^N` was given
    pub repeat: u32,
    /// Byte offset of the segment in the raw string
    pub offset: usize,
}

// ============================================================================
// Public API
// ============================================================================

/// Expand every `segment^N` into `N` comma-joined copies of `segment`
///
/// `N` is not capped: `T^4000000000` allocates billions of copies. Use
/// [`DomainParser`](crate::DomainParser) for untrusted input.
pub fn expand(input: &str) -> Result<String, SyntaxError> {
    let segments = segments(input)?;
    Ok(render(&segments))
}

/// Split a raw DDL string into segments without materialising the expansion
///
/// Lets callers check how many dimensions an input denotes before paying
/// for the expanded string.
pub fn segments(input: &str) -> Result<Vec<Segment<'_>>, SyntaxError> {
    match expansion::<VerboseError<&str>>(input, input) {
        Ok((_, segments)) => Ok(segments),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(SyntaxError::from_verbose(Phase::Expansion, input, e))
        }
        Err(nom::Err::Incomplete(_)) => Err(SyntaxError::new(
            Phase::Expansion,
            input,
            input.len(),
            "complete input",
        )),
    }
}

/// Total number of dimensions the segments expand to
pub fn expanded_len(segments: &[Segment<'_>]) -> u64 {
    segments.iter().map(|s| u64::from(s.repeat)).sum()
}

/// Join the segments, each repeated `repeat` times, with `,`
pub fn render(segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .inspect(|s| trace!(segment = s.text, repeat = s.repeat, "expanding segment"))
        .flat_map(|s| std::iter::repeat(s.text).take(s.repeat as usize))
        .collect::<Vec<_>>()
        .join(",")
}

// ============================================================================
// Internal Parsers
// ============================================================================

fn expansion<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, Vec<Segment<'a>>, E> {
    let (mut remaining, first) = segment(input, original_input)?;
    let mut segments = vec![first];

    while !remaining.is_empty() {
        let (rest, _) = context("',' or end of input", char(','))(remaining)?;
        let (rest, next) = cut(|i| segment(i, original_input))(rest)?;
        segments.push(next);
        remaining = rest;
    }

    Ok((remaining, segments))
}

fn segment<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
    original_input: &'a str,
) -> IResult<&'a str, Segment<'a>, E> {
    let offset = original_input.len() - input.len();
    let (input, text) = context("domain segment", is_a(SEGMENT_ALPHABET))(input)?;
    let (input, repeat) = opt(preceded(char('^'), cut(repeat_count)))(input)?;

    Ok((
        input,
        Segment {
            text,
            repeat: repeat.unwrap_or(1),
            offset,
        },
    ))
}

/// A non-zero digit followed by any digits; leading zeros are rejected
fn repeat_count<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    let (rest, digits) = context(
        "repeat count (1-9 followed by digits)",
        recognize(pair(one_of("123456789"), digit0)),
    )(input)?;

    match digits.parse::<u32>() {
        Ok(n) => Ok((rest, n)),
        Err(_) => Err(nom::Err::Failure(E::add_context(
            input,
            "repeat count that fits in 32 bits",
            E::from_error_kind(input, ErrorKind::Digit),
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================
