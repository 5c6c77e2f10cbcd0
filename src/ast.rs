//! Domain model for parsed DDL strings
//!
//! A DDL string such as `R(-10:10)^4` or `Z,B,T` describes the search space
//! of an optimization problem one dimension at a time:
//! - **Bounds**: a closed interval `[lower, upper]`, present as a whole or not at all
//! - **Domain**: one dimension's type (Real/Integer/Binary/Generic) plus optional bounds
//! - **DomainSequence**: the ordered dimensions; position is the dimension index
//!
//! Everything here is an immutable value. Equality is structural.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use thiserror::Error;

// =============================================================================
// BOUNDS
// =============================================================================

/// Closed numeric interval `[lower, upper]`
///
/// Both ends are finite. No ordering check is made between them: an
/// inverted interval such as `(5:-5)` is kept as written and admits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Bounds {
    lower: f64,
    upper: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("bounds must be finite, got ({0}:{1})")]
pub struct NonFiniteBounds(pub f64, pub f64);

impl Bounds {
    /// Returns `None` if either end is NaN or infinite
    pub fn new(lower: f64, upper: f64) -> Option<Self> {
        (lower.is_finite() && upper.is_finite()).then_some(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Check whether `value` lies in `[lower, upper]`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

impl TryFrom<(f64, f64)> for Bounds {
    type Error = NonFiniteBounds;

    fn try_from((lower, upper): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lower, upper).ok_or(NonFiniteBounds(lower, upper))
    }
}

impl From<Bounds> for (f64, f64) {
    fn from(bounds: Bounds) -> Self {
        (bounds.lower, bounds.upper)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // f64 Display never uses exponent notation, so this re-parses as a decimal
        write!(f, "({}:{})", self.lower, self.upper)
    }
}

// =============================================================================
// DOMAIN
// =============================================================================

/// The closed set of dimension types, keyed by their DDL tag letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainKind {
    Real,
    Integer,
    Binary,
    Generic,
}

impl DomainKind {
    /// Map a tag letter to its kind: `R`, `Z`, `B` or `T`
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'R' => Some(Self::Real),
            'Z' => Some(Self::Integer),
            'B' => Some(Self::Binary),
            'T' => Some(Self::Generic),
            _ => None,
        }
    }

    pub fn tag(self) -> char {
        match self {
            Self::Real => 'R',
            Self::Integer => 'Z',
            Self::Binary => 'B',
            Self::Generic => 'T',
        }
    }

    /// Construct a domain of this kind. Generic domains never carry bounds,
    /// so `bounds` is dropped for them.
    pub fn build(self, bounds: Option<Bounds>) -> Domain {
        match self {
            Self::Real => Domain::Real(bounds),
            Self::Integer => Domain::Integer(bounds),
            Self::Binary => Domain::Binary(bounds),
            Self::Generic => Domain::Generic,
        }
    }
}

/// A single search-space dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "bounds")]
pub enum Domain {
    Real(Option<Bounds>),
    Integer(Option<Bounds>),
    /// Bounds are syntactically permitted here even though `{0, 1}` already
    /// constrains the value.
    Binary(Option<Bounds>),
    Generic,
}

impl Domain {
    pub fn kind(&self) -> DomainKind {
        match self {
            Domain::Real(_) => DomainKind::Real,
            Domain::Integer(_) => DomainKind::Integer,
            Domain::Binary(_) => DomainKind::Binary,
            Domain::Generic => DomainKind::Generic,
        }
    }

    pub fn tag(&self) -> char {
        self.kind().tag()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Domain::Real(b) | Domain::Integer(b) | Domain::Binary(b) => *b,
            Domain::Generic => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Domain::Generic)
    }

    /// Check whether a coordinate value is admissible for this dimension
    ///
    /// Numeric domains never admit NaN or infinities. Integer domains
    /// require an integral value and binary domains require exactly 0 or 1;
    /// both must also fall inside the bounds when bounds are present.
    /// Generic domains are opaque and admit anything.
    pub fn admits(&self, value: f64) -> bool {
        let within = |bounds: &Option<Bounds>| bounds.map_or(true, |b| b.contains(value));
        match self {
            Domain::Real(b) => value.is_finite() && within(b),
            Domain::Integer(b) => value.is_finite() && value.fract() == 0.0 && within(b),
            Domain::Binary(b) => (value == 0.0 || value == 1.0) && within(b),
            Domain::Generic => true,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())?;
        if let Some(bounds) = self.bounds() {
            write!(f, "{}", bounds)?;
        }
        Ok(())
    }
}

// =============================================================================
// DOMAIN SEQUENCE
// =============================================================================

/// Ordered dimensions of a search space
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainSequence {
    domains: Vec<Domain>,
}

impl DomainSequence {
    pub fn new(domains: Vec<Domain>) -> Self {
        Self { domains }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Number of dimensions; same as [`len`](Self::len)
    pub fn dimension(&self) -> usize {
        self.domains.len()
    }

    pub fn get(&self, index: usize) -> Option<&Domain> {
        self.domains.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Domain> {
        self.domains.iter()
    }

    pub fn as_slice(&self) -> &[Domain] {
        &self.domains
    }

    pub fn into_vec(self) -> Vec<Domain> {
        self.domains
    }

    /// True when every dimension is identical (vacuously true when empty)
    pub fn is_homogeneous(&self) -> bool {
        self.domains.windows(2).all(|pair| pair[0] == pair[1])
    }

    /// Render back to DDL, folding runs of identical dimensions into `^N`
    ///
    /// `R(-10:10),R(-10:10),Z` becomes `R(-10:10)^2,Z`. For a non-empty
    /// sequence, expanding and parsing the result yields a sequence equal to
    /// `self`. An empty sequence renders as `""`, which is not valid DDL.
    pub fn to_compact_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut iter = self.domains.iter().peekable();

        while let Some(domain) = iter.next() {
            let mut count = 1usize;
            while iter.peek() == Some(&domain) {
                iter.next();
                count += 1;
            }
            if count > 1 {
                parts.push(format!("{}^{}", domain, count));
            } else {
                parts.push(domain.to_string());
            }
        }

        parts.join(",")
    }
}

impl fmt::Display for DomainSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, domain) in self.domains.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", domain)?;
        }
        Ok(())
    }
}

impl Index<usize> for DomainSequence {
    type Output = Domain;

    fn index(&self, index: usize) -> &Self::Output {
        &self.domains[index]
    }
}

impl FromIterator<Domain> for DomainSequence {
    fn from_iter<I: IntoIterator<Item = Domain>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DomainSequence {
    type Item = Domain;
    type IntoIter = std::vec::IntoIter<Domain>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.into_iter()
    }
}

impl<'a> IntoIterator for &'a DomainSequence {
    type Item = &'a Domain;
    type IntoIter = std::slice::Iter<'a, Domain>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================
