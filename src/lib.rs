//! domain-ddl: parser for the domain-description language (DDL)
//!
//! A DDL string declares the search space of an optimization problem as an
//! ordered list of typed, optionally bounded dimensions:
//! - `R(-10:10)^4` - four reals in `[-10, 10]`
//! - `Z,B,T` - an integer, a binary value and an opaque generic dimension
//!
//! Parsing runs in two phases:
//! - Expander: textual `segment^N` repetition ([`expand`])
//! - Interpreter: expanded text to a [`DomainSequence`] ([`parse`])
//!
//! [`parse_domain`] composes both. [`DomainParser`] does the same while
//! enforcing [`ParserLimits`] on the size of the expansion.
//!
//! ```
//! use domain_ddl::{parse_domain, Bounds, Domain};
//!
//! let seq = parse_domain("R(-10:10)^2,Z").unwrap();
//! assert_eq!(seq.len(), 3);
//! assert_eq!(seq[0], Domain::Real(Bounds::new(-10.0, 10.0)));
//! assert_eq!(seq.to_compact_string(), "R(-10:10)^2,Z");
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod domain_parser;
pub mod expander;
pub mod parser;

// Re-export commonly used types
pub use ast::{Bounds, Domain, DomainKind, DomainSequence, NonFiniteBounds};
pub use config::loader::ConfigLoader;
pub use config::ParserLimits;
pub use diagnostics::{Phase, SyntaxError};
pub use domain_parser::{DomainError, DomainParser};
pub use expander::{expand, segments, Segment};
pub use parser::{parse, parse_domain};
