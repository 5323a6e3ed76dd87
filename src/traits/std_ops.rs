use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::dual::Dual;
use crate::float::Float;
use crate::reverse::{rev_binary, rev_unary, Reverse};
use crate::tape::TapeThreadLocal;

// ──────────────────────────────────────────────
//  Dual<F>
// ──────────────────────────────────────────────

impl<F: Float> Add for Dual<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Dual::new(self.re + rhs.re, self.eps + rhs.eps)
    }
}

impl<F: Float> Sub for Dual<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Dual::new(self.re - rhs.re, self.eps - rhs.eps)
    }
}

impl<F: Float> Mul for Dual<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Dual::new(self.re * rhs.re, self.re * rhs.eps + self.eps * rhs.re)
    }
}

impl<F: Float> Div for Dual<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = F::one() / rhs.re;
        Dual::new(
            self.re * inv,
            (self.eps * rhs.re - self.re * rhs.eps) * inv * inv,
        )
    }
}

impl<F: Float> Neg for Dual<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Dual::new(-self.re, -self.eps)
    }
}

// Plain scalars on the right behave as constants.
impl<F: Float> Add<F> for Dual<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: F) -> Self {
        self + Dual::constant(rhs)
    }
}

impl<F: Float> Sub<F> for Dual<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: F) -> Self {
        self - Dual::constant(rhs)
    }
}

impl<F: Float> Mul<F> for Dual<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: F) -> Self {
        Dual::new(self.re * rhs, self.eps * rhs)
    }
}

impl<F: Float> Div<F> for Dual<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: F) -> Self {
        let inv = F::one() / rhs;
        Dual::new(self.re * inv, self.eps * inv)
    }
}

impl<F: Float> PartialEq for Dual<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re
    }
}

impl<F: Float> PartialOrd for Dual<F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.re.partial_cmp(&other.re)
    }
}

// ──────────────────────────────────────────────
//  Reverse<F>
// ──────────────────────────────────────────────

impl<F: TapeThreadLocal> Add for Reverse<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        rev_binary(self, rhs, self.value + rhs.value, F::one(), F::one())
    }
}

impl<F: TapeThreadLocal> Sub for Reverse<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        rev_binary(self, rhs, self.value - rhs.value, F::one(), -F::one())
    }
}

impl<F: TapeThreadLocal> Mul for Reverse<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        rev_binary(self, rhs, self.value * rhs.value, rhs.value, self.value)
    }
}

impl<F: TapeThreadLocal> Div for Reverse<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = F::one() / rhs.value;
        let value = self.value * inv;
        rev_binary(self, rhs, value, inv, -value * inv)
    }
}

impl<F: TapeThreadLocal> Neg for Reverse<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        rev_unary(self, -self.value, -F::one())
    }
}

impl<F: TapeThreadLocal> Add<F> for Reverse<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: F) -> Self {
        rev_unary(self, self.value + rhs, F::one())
    }
}

impl<F: TapeThreadLocal> Sub<F> for Reverse<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: F) -> Self {
        rev_unary(self, self.value - rhs, F::one())
    }
}

impl<F: TapeThreadLocal> Mul<F> for Reverse<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: F) -> Self {
        rev_unary(self, self.value * rhs, rhs)
    }
}

impl<F: TapeThreadLocal> Div<F> for Reverse<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: F) -> Self {
        let inv = F::one() / rhs;
        rev_unary(self, self.value * inv, inv)
    }
}

impl<F: Float> PartialEq for Reverse<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<F: Float> PartialOrd for Reverse<F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

// ──────────────────────────────────────────────
//  Compound assignment (both types)
// ──────────────────────────────────────────────

macro_rules! impl_assign_ops {
    ($ty:ident, $bound:path) => {
        impl<F: $bound> AddAssign for $ty<F> {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl<F: $bound> SubAssign for $ty<F> {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl<F: $bound> MulAssign for $ty<F> {
            #[inline]
            fn mul_assign(&mut self, rhs: Self) {
                *self = *self * rhs;
            }
        }

        impl<F: $bound> DivAssign for $ty<F> {
            #[inline]
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
            }
        }
    };
}

impl_assign_ops!(Dual, Float);
impl_assign_ops!(Reverse, TapeThreadLocal);

// ──────────────────────────────────────────────
//  Primitive on the left: `2.0 * x`, `1.0 - x`, ...
// ──────────────────────────────────────────────

macro_rules! impl_scalar_lhs_ops {
    ($f:ty) => {
        impl Add<Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn add(self, rhs: Dual<$f>) -> Dual<$f> {
                rhs + self
            }
        }

        impl Sub<Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn sub(self, rhs: Dual<$f>) -> Dual<$f> {
                Dual::new(self - rhs.re, -rhs.eps)
            }
        }

        impl Mul<Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn mul(self, rhs: Dual<$f>) -> Dual<$f> {
                rhs * self
            }
        }

        impl Div<Dual<$f>> for $f {
            type Output = Dual<$f>;
            #[inline]
            fn div(self, rhs: Dual<$f>) -> Dual<$f> {
                Dual::constant(self) / rhs
            }
        }

        impl Add<Reverse<$f>> for $f {
            type Output = Reverse<$f>;
            #[inline]
            fn add(self, rhs: Reverse<$f>) -> Reverse<$f> {
                rhs + self
            }
        }

        impl Sub<Reverse<$f>> for $f {
            type Output = Reverse<$f>;
            #[inline]
            fn sub(self, rhs: Reverse<$f>) -> Reverse<$f> {
                rev_unary(rhs, self - rhs.value, -1.0)
            }
        }

        impl Mul<Reverse<$f>> for $f {
            type Output = Reverse<$f>;
            #[inline]
            fn mul(self, rhs: Reverse<$f>) -> Reverse<$f> {
                rhs * self
            }
        }

        impl Div<Reverse<$f>> for $f {
            type Output = Reverse<$f>;
            #[inline]
            fn div(self, rhs: Reverse<$f>) -> Reverse<$f> {
                let inv: $f = 1.0 / rhs.value;
                rev_unary(rhs, self * inv, -self * inv * inv)
            }
        }
    };
}

impl_scalar_lhs_ops!(f32);
impl_scalar_lhs_ops!(f64);
