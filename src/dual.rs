use std::fmt::{self, Display};

use crate::Float;

/// Forward-mode (tangent) value: a primal paired with its tangent.
///
/// `Dual { re, eps }` represents `re + eps·ε` where `ε² = 0`. The tangent is
/// the derivative slot forward-mode Jacobians seed and read.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dual<F: Float> {
    /// Primal (real) value.
    pub re: F,
    /// Tangent (derivative) value.
    pub eps: F,
}

impl<F: Float> Display for Dual<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}ε", self.re, self.eps)
    }
}

impl<F: Float> Dual<F> {
    #[inline]
    pub fn new(re: F, eps: F) -> Self {
        Dual { re, eps }
    }

    /// Create a constant (zero tangent).
    #[inline]
    pub fn constant(re: F) -> Self {
        Dual { re, eps: F::zero() }
    }

    /// Create a variable seeded with a unit tangent.
    #[inline]
    pub fn variable(re: F) -> Self {
        Dual { re, eps: F::one() }
    }

    #[inline]
    pub fn value(&self) -> F {
        self.re
    }

    #[inline]
    pub fn derivative(&self) -> F {
        self.eps
    }

    /// The tangent slot, for seeding.
    #[inline]
    pub fn derivative_mut(&mut self) -> &mut F {
        &mut self.eps
    }

    /// Chain rule: given `f(self.re)` and `f'(self.re)`, produce the dual result.
    #[inline]
    fn chain(self, f_val: F, f_deriv: F) -> Self {
        Dual {
            re: f_val,
            eps: self.eps * f_deriv,
        }
    }

    pub fn recip(self) -> Self {
        let inv = F::one() / self.re;
        self.chain(inv, -inv * inv)
    }

    pub fn sqrt(self) -> Self {
        let s = self.re.sqrt();
        self.chain(s, F::one() / (s + s))
    }

    pub fn powi(self, n: i32) -> Self {
        let deriv = F::from_i32(n).unwrap_or_else(F::zero) * self.re.powi(n - 1);
        self.chain(self.re.powi(n), deriv)
    }

    pub fn powf(self, n: Self) -> Self {
        // d(x^y) = y·x^(y-1)·dx + x^y·ln(x)·dy
        let val = self.re.powf(n.re);
        Dual {
            re: val,
            eps: n.re * self.re.powf(n.re - F::one()) * self.eps + val * self.re.ln() * n.eps,
        }
    }

    pub fn exp(self) -> Self {
        let e = self.re.exp();
        self.chain(e, e)
    }

    pub fn ln(self) -> Self {
        self.chain(self.re.ln(), F::one() / self.re)
    }

    pub fn sin(self) -> Self {
        self.chain(self.re.sin(), self.re.cos())
    }

    pub fn cos(self) -> Self {
        self.chain(self.re.cos(), -self.re.sin())
    }

    pub fn tan(self) -> Self {
        let c = self.re.cos();
        self.chain(self.re.tan(), F::one() / (c * c))
    }

    pub fn tanh(self) -> Self {
        let t = self.re.tanh();
        self.chain(t, F::one() - t * t)
    }

    pub fn abs(self) -> Self {
        self.chain(self.re.abs(), self.re.signum())
    }
}
