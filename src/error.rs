//! Error types for Jacobian computation.

use std::fmt;

use thiserror::Error;

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Which extent of the Jacobian failed to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// Number of rows in the destination (must equal the codomain).
    Rows,
    /// Number of columns in the given destination row (must equal the domain).
    Columns {
        /// Index of the offending row.
        row: usize,
    },
    /// Number of values returned by the function under differentiation.
    Outputs,
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Rows => write!(f, "destination rows"),
            Extent::Columns { row } => write!(f, "columns of destination row {}", row),
            Extent::Outputs => write!(f, "function outputs"),
        }
    }
}

/// Errors that can occur while computing a Jacobian.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The destination or the function output disagrees with the resolved
    /// `codomain × domain` shape.
    #[error("Dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The extent being checked
        what: Extent,
        /// Size implied by the resolved shape
        expected: usize,
        /// Size actually found
        actual: usize,
    },
}

impl Error {
    pub(crate) fn mismatch(what: Extent, expected: usize, actual: usize) -> Self {
        Error::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }
}
