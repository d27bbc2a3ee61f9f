//! Error types for the JSON front end.
//!
//! Hashing itself cannot fail: unsupported types are rejected at compile
//! time and malformed shapes panic. Reading and writing text can fail, and
//! those failures are reported here with the input position.

use std::fmt;

use thiserror::Error;

/// A line/column location in JSON input, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number.
    pub line: u32,
    /// Column number (in bytes).
    pub column: u32,
}

impl Position {
    /// Start of input.
    pub const START: Self = Self { line: 1, column: 1 };
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that can occur while writing or reading JSON.
#[derive(Debug, Error)]
pub enum JsonError {
    /// Malformed input text
    #[error("error @ {at}: {message}")]
    Syntax {
        /// Where the problem was found
        at: Position,
        /// What was expected or found
        message: String,
    },

    /// Object member that the target type does not have
    #[error("error @ {at}: no member named '{field}' in '{ty}'")]
    UnknownField {
        /// Where the member key starts
        at: Position,
        /// Member key
        field: String,
        /// Target type name
        ty: &'static str,
    },

    /// Object member given twice
    #[error("error @ {at}: duplicate member '{field}' in '{ty}'")]
    DuplicateField {
        /// Where the second occurrence was read
        at: Position,
        /// Member key
        field: &'static str,
        /// Target type name
        ty: &'static str,
    },

    /// Object closed before every member was read
    #[error("error @ {at}: incomplete initialization of object: missing '{field}' in '{ty}'")]
    MissingField {
        /// Where the object started
        at: Position,
        /// First missing member
        field: &'static str,
        /// Target type name
        ty: &'static str,
    },

    /// Array with the wrong number of elements for a fixed-arity target
    #[error("error @ {at}: expected {expected} element(s), found {found}")]
    Arity {
        /// Where the array started
        at: Position,
        /// Required element count
        expected: usize,
        /// Element count in the input
        found: usize,
    },

    /// Number that does not fit the target integer type
    #[error("error @ {at}: number {literal} out of range for {ty}")]
    OutOfRange {
        /// Where the number starts
        at: Position,
        /// The number as written
        literal: String,
        /// Target type name
        ty: &'static str,
    },

    /// Enum variant name the target type does not have
    #[error("error @ {at}: unknown variant '{variant}' of '{ty}'")]
    UnknownVariant {
        /// Where the variant name starts
        at: Position,
        /// Variant name as written
        variant: String,
        /// Target enum name
        ty: &'static str,
    },

    /// Arrays/objects nested deeper than the configured limit
    #[error("error @ {at}: nesting exceeds depth limit of {limit}")]
    DepthLimit {
        /// Where the limit was crossed
        at: Position,
        /// Configured limit
        limit: usize,
    },

    /// NaN or infinity, which JSON cannot represent
    #[error("cannot write non-finite number {0}")]
    NonFinite(f64),

    /// The output sink failed
    #[error("output sink failed")]
    Fmt(#[from] fmt::Error),
}

/// Result type alias for JSON operations.
pub type JsonResult<T> = Result<T, JsonError>;

impl JsonError {
    /// Create a syntax error at `at`.
    pub fn syntax(at: Position, message: impl Into<String>) -> Self {
        Self::Syntax {
            at,
            message: message.into(),
        }
    }

    /// Input position the error refers to, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Syntax { at, .. }
            | Self::UnknownField { at, .. }
            | Self::DuplicateField { at, .. }
            | Self::MissingField { at, .. }
            | Self::Arity { at, .. }
            | Self::OutOfRange { at, .. }
            | Self::UnknownVariant { at, .. }
            | Self::DepthLimit { at, .. } => Some(*at),
            Self::NonFinite(_) | Self::Fmt(_) => None,
        }
    }
}
