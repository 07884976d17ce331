//! Error types for geoshapes

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoshapesError {
    // Validation errors
    #[error("Invalid geometry: {0}")]
    Shape(#[from] ShapeError),

    // Serialization errors
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GeoshapesError>;

/// One step of a [`Location`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Member(String),
    Index(usize),
}

/// Path from the root of the input to the element a violation refers to
///
/// Displayed as `geometries[1].coordinates[0][2]`; the empty path displays as `(root)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    segments: Vec<Segment>,
}

impl Location {
    pub fn root() -> Self {
        Self::default()
    }

    /// Location of the member `name` inside this location
    pub fn member(&self, name: &str) -> Self {
        self.push(Segment::Member(name.to_string()))
    }

    /// Location of the element at `index` inside this location
    pub fn index(&self, index: usize) -> Self {
        self.push(Segment::Index(index))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    fn push(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Member(name) if i == 0 => f.write_str(name)?,
                Segment::Member(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Why a single element failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViolationKind {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing required member '{name}'")]
    MissingMember { name: &'static str },

    #[error("foreign member '{name}' is not allowed")]
    ForeignMember { name: String },

    #[error("wrong tag literal: expected \"{expected}\", found \"{found}\"")]
    WrongTag { expected: &'static str, found: String },

    #[error("unrecognized geometry type \"{found}\"")]
    UnknownGeometryType { found: String },

    #[error("expected a string")]
    NotAString,

    #[error("expected an array")]
    NotAnArray,

    #[error("expected a number")]
    NotANumber,

    #[error("non-finite number: NaN and infinities have no JSON form")]
    NonFiniteNumber,

    #[error("wrong arity: a position has 2 or 3 values, found {found}")]
    WrongArity { found: usize },

    #[error("insufficient points: at least {min} positions required, found {found}")]
    InsufficientPoints { min: usize, found: usize },

    #[error("ring too short: a linear ring needs at least 4 positions, found {found}")]
    RingTooShort { found: usize },

    #[error("ring not closed: first and last positions differ")]
    RingNotClosed,

    #[error("invalid bbox: expected 4 or 6 values, found {found}")]
    BboxLength { found: usize },
}

/// A validation failure with the location it was found at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct Violation {
    pub location: Location,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(location: Location, kind: ViolationKind) -> Self {
        Self { location, kind }
    }
}

/// Rejection of a geometry at construction time
///
/// Carries every violation found in the input, in the order they were detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    violations: Vec<Violation>,
}

impl ShapeError {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Error with a single violation
    pub fn single(location: Location, kind: ViolationKind) -> Self {
        Self::new(vec![Violation::new(location, kind)])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The first violation detected
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violations.split_first() {
            None => f.write_str("invalid geometry"),
            Some((first, [])) => write!(f, "{}", first),
            Some((first, rest)) => write!(f, "{} (and {} more)", first, rest.len()),
        }
    }
}

impl std::error::Error for ShapeError {}
