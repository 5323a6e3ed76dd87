//! Dimension resolution shared by both Jacobian computers.

use crate::error::{Error, Extent, Result};

/// Resolved `codomain × domain` shape of a Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Number of rows (function outputs).
    pub codomain: usize,
    /// Number of columns (function inputs).
    pub domain: usize,
}

/// The authoritative codomain: the declared one, or the output length of one
/// evaluation when none is declared.
pub(crate) fn resolve_codomain(declared: Option<usize>, evaluate: impl FnOnce() -> usize) -> usize {
    match declared {
        Some(m) => m,
        None => evaluate(),
    }
}

/// Check that an evaluation produced exactly `codomain` outputs.
pub(crate) fn check_outputs(codomain: usize, actual: usize) -> Result<()> {
    if actual != codomain {
        return Err(Error::mismatch(Extent::Outputs, codomain, actual));
    }
    Ok(())
}
