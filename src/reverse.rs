use std::fmt::{self, Display};

use crate::tape::{self, TapeThreadLocal, CONSTANT};
use crate::Float;

/// Reverse-mode (adjoint) value.
///
/// A primal value plus its index on the active [`Tape`](crate::tape::Tape).
/// The adjoint slot itself lives on the tape; read and seed it through
/// [`Tape::derivative`](crate::tape::Tape::derivative) and
/// [`Tape::derivative_mut`](crate::tape::Tape::derivative_mut).
#[derive(Clone, Copy, Debug)]
pub struct Reverse<F: Float> {
    pub(crate) value: F,
    pub(crate) index: u32,
}

impl<F: Float> Reverse<F> {
    /// An unregistered value. It becomes an independent variable once a tape
    /// registers it, which the Jacobian entry points do on a private copy.
    #[inline]
    pub fn new(value: F) -> Self {
        Self::constant(value)
    }

    /// Create a constant (not tracked on tape).
    #[inline]
    pub fn constant(value: F) -> Self {
        Reverse {
            value,
            index: CONSTANT,
        }
    }

    /// Primal value.
    #[inline]
    pub fn value(&self) -> F {
        self.value
    }

    /// Tape index, or [`CONSTANT`] when unregistered.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Whether this value has a slot on a tape.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.index != CONSTANT
    }
}

impl<F: Float> Display for Reverse<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<F: Float> Default for Reverse<F> {
    fn default() -> Self {
        Reverse::constant(F::zero())
    }
}

/// Record a unary elemental on the active tape.
#[inline]
pub(crate) fn rev_unary<F: TapeThreadLocal>(x: Reverse<F>, f_val: F, f_deriv: F) -> Reverse<F> {
    let index = tape::with_active_tape(|t| t.push_unary(x.index, f_deriv));
    Reverse {
        value: f_val,
        index,
    }
}

/// Record a binary elemental on the active tape.
#[inline]
pub(crate) fn rev_binary<F: TapeThreadLocal>(
    x: Reverse<F>,
    y: Reverse<F>,
    f_val: F,
    dx: F,
    dy: F,
) -> Reverse<F> {
    let index = tape::with_active_tape(|t| t.push_binary(x.index, dx, y.index, dy));
    Reverse {
        value: f_val,
        index,
    }
}

impl<F: TapeThreadLocal> Reverse<F> {
    pub fn recip(self) -> Self {
        let inv = F::one() / self.value;
        rev_unary(self, inv, -inv * inv)
    }

    pub fn sqrt(self) -> Self {
        let s = self.value.sqrt();
        rev_unary(self, s, F::one() / (s + s))
    }

    pub fn powi(self, n: i32) -> Self {
        let deriv = F::from_i32(n).unwrap_or_else(F::zero) * self.value.powi(n - 1);
        rev_unary(self, self.value.powi(n), deriv)
    }

    /// `self^n`; the exponent may itself be active.
    pub fn powf(self, n: Self) -> Self {
        let val = self.value.powf(n.value);
        let dx = n.value * self.value.powf(n.value - F::one());
        let dn = val * self.value.ln();
        rev_binary(self, n, val, dx, dn)
    }

    pub fn exp(self) -> Self {
        let e = self.value.exp();
        rev_unary(self, e, e)
    }

    pub fn ln(self) -> Self {
        rev_unary(self, self.value.ln(), F::one() / self.value)
    }

    pub fn sin(self) -> Self {
        rev_unary(self, self.value.sin(), self.value.cos())
    }

    pub fn cos(self) -> Self {
        rev_unary(self, self.value.cos(), -self.value.sin())
    }

    pub fn tan(self) -> Self {
        let c = self.value.cos();
        rev_unary(self, self.value.tan(), F::one() / (c * c))
    }

    pub fn tanh(self) -> Self {
        let t = self.value.tanh();
        rev_unary(self, t, F::one() - t * t)
    }

    pub fn abs(self) -> Self {
        rev_unary(self, self.value.abs(), self.value.signum())
    }
}
