/// How much of the destination is checked against the domain before sweeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowCheck {
    /// Only the first row; the others are assumed to have the same width.
    /// A shorter later row panics on the first out-of-range write.
    First,
    /// Every row (default).
    #[default]
    All,
}

/// Configuration shared by the forward and adjoint Jacobian computers.
#[derive(Debug, Clone, Default)]
pub struct JacobianConfig {
    /// Number of function outputs. `None` (or `Some(0)`) infers it from one
    /// evaluation of the function (default: `None`).
    pub codomain: Option<usize>,
    /// Destination validation depth (default: [`RowCheck::All`]).
    pub row_check: RowCheck,
}

impl JacobianConfig {
    /// Declare the number of function outputs up front.
    pub fn with_codomain(mut self, codomain: usize) -> Self {
        self.codomain = Some(codomain);
        self
    }

    /// Choose how many destination rows are width-checked.
    pub fn with_row_check(mut self, row_check: RowCheck) -> Self {
        self.row_check = row_check;
        self
    }

    /// The declared codomain, with zero meaning "not declared".
    pub(crate) fn declared_codomain(&self) -> Option<usize> {
        self.codomain.filter(|&m| m > 0)
    }
}
