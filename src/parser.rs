//! Domain interpreter
//!
//! Second phase of DDL processing: turns an expanded string such as
//! `R(-10:10),Z,T` into a [`DomainSequence`].
//!
//! ## Grammar
//!
//! ```text
//! domains  := domain ("," domain)*
//! domain   := generic | numeric
//! generic  := "T"
//! numeric  := ("R" | "Z" | "B") bounds?
//! bounds   := "(" ")" | "(" decimal? ":" decimal? ")"
//! decimal  := "-"? digit+ ("." digit+)?
//! ```
//!
//! A bounds clause with either side missing yields a domain with no bounds
//! at all: `R(:10)`, `R(-10:)` and `R()` all mean plain `R`.

use nom::{
    branch::alt,
    character::complete::{char, digit1, one_of},
    combinator::{cut, map, map_opt, opt, recognize},
    error::{context, ContextError, ErrorKind, ParseError as NomParseError, VerboseError},
    sequence::{pair, preceded},
    IResult,
};
use tracing::debug;

use crate::ast::{Bounds, Domain, DomainKind, DomainSequence};
use crate::diagnostics::{Phase, SyntaxError};
use crate::expander::expand;

// ============================================================================
// Public API
// ============================================================================

/// Interpret an already expanded DDL string
///
/// The input must not contain `^N` shorthand; run it through
/// [`expand`](crate::expander::expand) first, or use [`parse_domain`].
pub fn parse(expanded: &str) -> Result<DomainSequence, SyntaxError> {
    match domain_list::<VerboseError<&str>>(expanded) {
        Ok((_, domains)) => {
            debug!(dimensions = domains.len(), "parsed domain string");
            Ok(domains)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(SyntaxError::from_verbose(Phase::Interpretation, expanded, e))
        }
        Err(nom::Err::Incomplete(_)) => Err(SyntaxError::new(
            Phase::Interpretation,
            expanded,
            expanded.len(),
            "complete input",
        )),
    }
}

/// Expand and interpret a raw DDL string
///
/// Interpretation errors carry offsets into the expanded string. Repeat
/// counts are not capped here; use [`DomainParser`](crate::DomainParser)
/// for untrusted input.
pub fn parse_domain(input: &str) -> Result<DomainSequence, SyntaxError> {
    let expanded = expand(input)?;
    parse(&expanded)
}

// ============================================================================
// Internal Parsers
// ============================================================================

fn domain_list<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, DomainSequence, E> {
    let (mut remaining, first) = domain(input)?;
    let mut domains = vec![first];

    while !remaining.is_empty() {
        let (rest, _) = context("',' or end of input", char(','))(remaining)?;
        let (rest, next) = cut(domain)(rest)?;
        domains.push(next);
        remaining = rest;
    }

    Ok((remaining, DomainSequence::new(domains)))
}

fn domain<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Domain, E> {
    context(
        "domain type (R, Z, B or T)",
        alt((generic_domain, numeric_domain)),
    )(input)
}

/// `T` never takes a bounds clause
fn generic_domain<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Domain, E> {
    map(char('T'), |_| Domain::Generic)(input)
}

fn numeric_domain<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Domain, E> {
    let (input, kind) = map_opt(one_of("RZB"), DomainKind::from_tag)(input)?;
    let (input, bounds) = opt(bounds_clause)(input)?;
    Ok((input, kind.build(bounds.flatten())))
}

/// `()` or `( decimal? : decimal? )`; `None` unless both sides are present
fn bounds_clause<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Option<Bounds>, E> {
    let (input, _) = char('(')(input)?;
    if let Ok((rest, _)) = char::<_, E>(')')(input) {
        return Ok((rest, None));
    }
    let (input, lower) = opt(decimal)(input)?;
    let (input, _) = cut(context("':' between bounds", char(':')))(input)?;
    let (input, upper) = opt(decimal)(input)?;
    let (input, _) = cut(context("closing parenthesis", char(')')))(input)?;

    let bounds = match (lower, upper) {
        (Some(lower), Some(upper)) => Bounds::new(lower, upper),
        _ => None,
    };
    Ok((input, bounds))
}

fn decimal<'a, E: NomParseError<&'a str> + ContextError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, f64, E> {
    let (body, sign) = opt(char('-'))(input)?;
    let mut unsigned = recognize::<_, _, E, _>(pair(
        digit1,
        opt(preceded(
            char('.'),
            cut(context("digits after '.'", digit1)),
        )),
    ));
    let (rest, _) = if sign.is_some() {
        cut(context("digits after '-'", unsigned))(body)?
    } else {
        unsigned(body)?
    };

    let text = &input[..input.len() - rest.len()];
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok((rest, value)),
        _ => Err(nom::Err::Failure(E::add_context(
            input,
            "finite decimal",
            E::from_error_kind(input, ErrorKind::Float),
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn real(lower: f64, upper: f64) -> Domain {
        Domain::Real(Bounds::new(lower, upper))
    }

    #[test]
    fn test_expanded_reals_with_bounds() {
        let seq = parse(&expand("R(-10:10)^4").unwrap()).unwrap();
        assert_eq!(seq.len(), 4);
        assert!(seq.iter().all(|d| *d == real(-10.0, 10.0)));
    }

    #[test]
    fn test_unbounded_mixed_types() {
        let seq = parse("Z,B,T").unwrap();
        assert_eq!(
            seq.into_vec(),
            vec![Domain::Integer(None), Domain::Binary(None), Domain::Generic]
        );
    }

    #[test]
    fn test_generic_list() {
        let seq = parse("T,T,T").unwrap();
        assert_eq!(seq.len(), 3);
        assert!(seq.iter().all(|d| *d == Domain::Generic));
    }

    #[test]
    fn test_generic_then_numeric() {
        let seq = parse("T,R(0:1)").unwrap();
        assert_eq!(seq.into_vec(), vec![Domain::Generic, real(0.0, 1.0)]);
    }

    #[test]
    fn test_missing_side_discards_bounds() {
        assert_eq!(parse("R(:10)").unwrap().into_vec(), vec![Domain::Real(None)]);
        assert_eq!(parse("R(-10:)").unwrap().into_vec(), vec![Domain::Real(None)]);
        assert_eq!(parse("R(:)").unwrap().into_vec(), vec![Domain::Real(None)]);
        assert_eq!(parse("Z(3:)").unwrap().into_vec(), vec![Domain::Integer(None)]);
    }

    #[test]
    fn test_empty_bounds_clause() {
        assert_eq!(parse("R()").unwrap().into_vec(), vec![Domain::Real(None)]);
    }

    #[test]
    fn test_empty_bounds_clause_in_list() {
        assert_eq!(parse("Z()").unwrap().into_vec(), vec![Domain::Integer(None)]);
        assert_eq!(
            parse("B(),R").unwrap().into_vec(),
            vec![Domain::Binary(None), Domain::Real(None)]
        );
        assert_eq!(parse_domain("R()^2").unwrap(), parse("R,R").unwrap());
    }

    #[test]
    fn test_partial_bounds_equal_no_bounds() {
        assert_eq!(parse("R(:10),B(0:)").unwrap(), parse("R,B").unwrap());
    }

    #[test]
    fn test_decimal_forms() {
        let seq = parse("R(-0.5:2.25),Z(0:100),B(0:1)").unwrap();
        assert_eq!(seq[0], real(-0.5, 2.25));
        assert_eq!(seq[1], Domain::Integer(Bounds::new(0.0, 100.0)));
        assert_eq!(seq[2], Domain::Binary(Bounds::new(0.0, 1.0)));
    }

    #[test]
    fn test_inverted_bounds_accepted() {
        let seq = parse("R(5:-5)").unwrap();
        let bounds = seq[0].bounds().unwrap();
        assert_eq!(bounds.lower(), 5.0);
        assert_eq!(bounds.upper(), -5.0);
    }

    #[test]
    fn test_explicit_repetition_equals_expansion() {
        assert_eq!(
            parse("R(-5:5),R(-5:5)").unwrap(),
            parse(&expand("R(-5:5)^2").unwrap()).unwrap()
        );
    }

    #[test]
    fn test_parse_domain_expands_first() {
        assert_eq!(
            parse_domain("R(-5:5)^2,T").unwrap(),
            parse("R(-5:5),R(-5:5),T").unwrap()
        );
    }

    #[test]
    fn test_deterministic() {
        let input = "R(-1.5:1.5),Z(0:9),B,T";
        assert_eq!(parse(input).unwrap(), parse(input).unwrap());
    }

    #[test]
    fn test_long_list_does_not_recurse() {
        let input = vec!["R(0:1)"; 50_000].join(",");
        assert_eq!(parse(&input).unwrap().len(), 50_000);
    }

    // =========================================================================
    // ERROR CASE TESTS
    // =========================================================================

    #[test]
    fn test_error_unknown_type() {
        let err = parse("X").unwrap_err();
        assert_eq!(err.phase, Phase::Interpretation);
        assert_eq!(err.offset, 0);
        assert_eq!(err.expected, "domain type (R, Z, B or T)");
        assert_eq!(err.found, "'X'");
    }

    #[test]
    fn test_error_unclosed_bounds() {
        let err = parse("R(1:2").unwrap_err();
        assert_eq!(err.offset, 5);
        assert_eq!(err.expected, "closing parenthesis");
        assert_eq!(err.found, "end of input");
    }

    #[test]
    fn test_error_missing_colon() {
        let err = parse("R(1)").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.expected, "':' between bounds");

        assert_eq!(parse("R(1,2)").unwrap_err().offset, 3);
    }

    #[test]
    fn test_error_decimal_without_digits() {
        let err = parse("R(-:1)").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.expected, "digits after '-'");

        let err = parse("R(1.:2)").unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.expected, "digits after '.'");

        assert!(parse("R(.5:1)").is_err());
    }

    #[test]
    fn test_error_non_finite_decimal() {
        let huge = "9".repeat(400);
        let err = parse(&format!("R(0:{})", huge)).unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.expected, "finite decimal");
    }

    #[test]
    fn test_error_generic_with_bounds() {
        let err = parse("T(0:1)").unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.expected, "',' or end of input");
    }

    #[test]
    fn test_error_trailing_input() {
        assert_eq!(parse("R(0:1)x").unwrap_err().offset, 6);
        assert_eq!(parse("R,").unwrap_err().offset, 2);
        assert_eq!(parse("RZ").unwrap_err().offset, 1);
    }

    #[test]
    fn test_error_unexpanded_shorthand() {
        let err = parse("R^2").unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.found, "'^'");
    }

    #[test]
    fn test_error_empty_input() {
        let err = parse("").unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.found, "end of input");
    }

    #[test]
    fn test_parse_domain_reports_expansion_phase() {
        let err = parse_domain("R^0").unwrap_err();
        assert_eq!(err.phase, Phase::Expansion);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_bound() -> impl Strategy<Value = f64> {
        (-1_000_000i64..1_000_000i64, 0i32..4).prop_map(|(n, scale)| n as f64 / 10f64.powi(scale))
    }

    fn arb_domain() -> impl Strategy<Value = Domain> {
        let bounds = prop::option::of((arb_bound(), arb_bound()))
            .prop_map(|b| b.and_then(|(l, u)| Bounds::new(l, u)))
            .boxed();
        prop_oneof![
            bounds.clone().prop_map(Domain::Real),
            bounds.clone().prop_map(Domain::Integer),
            bounds.prop_map(Domain::Binary),
            Just(Domain::Generic),
        ]
    }

    proptest! {
        #[test]
        fn display_then_parse_round_trips(
            domains in prop::collection::vec(arb_domain(), 1..12),
        ) {
            let seq = DomainSequence::new(domains);
            prop_assert_eq!(parse(&seq.to_string()).unwrap(), seq);
        }

        #[test]
        fn compact_string_expands_back(
            domains in prop::collection::vec(arb_domain(), 1..12),
        ) {
            let seq = DomainSequence::new(domains);
            prop_assert_eq!(parse_domain(&seq.to_compact_string()).unwrap(), seq);
        }

        #[test]
        fn repeated_parse_is_deterministic(
            domains in prop::collection::vec(arb_domain(), 1..12),
        ) {
            let text = DomainSequence::new(domains).to_string();
            prop_assert_eq!(parse(&text).unwrap(), parse(&text).unwrap());
        }
    }
}
