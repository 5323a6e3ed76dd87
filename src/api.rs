//! Allocating entry points returning the Jacobian as `Vec<Vec<F>>`.

use crate::dual::Dual;
use crate::error::Result;
use crate::jacobian::{adjoint, forward, JacobianConfig, RowSink};
use crate::reverse::Reverse;
use crate::tape::{self, Tape, TapeThreadLocal};
use crate::Float;

/// Full Jacobian of `f : R^n → R^m` in adjoint (reverse) mode.
///
/// Returns `J` with `J[i][j] = ∂f_i/∂x_j`. The output count is inferred from
/// the recorded evaluation, so `f` runs exactly once. The thread's active
/// tape is used if one is registered, else a temporary one.
///
/// ```
/// use jacobian_ad::{adjoint_jacobian, Reverse};
///
/// let x = [Reverse::new(3.0_f64), Reverse::new(2.0)];
/// let jac = adjoint_jacobian(&x, |v| vec![v[0] * v[1], v[0] + v[1] * v[1]]).unwrap();
/// assert_eq!(jac, vec![vec![2.0, 3.0], vec![1.0, 4.0]]);
/// ```
pub fn adjoint_jacobian<F: TapeThreadLocal>(
    x: &[Reverse<F>],
    f: impl FnMut(&mut [Reverse<F>]) -> Vec<Reverse<F>>,
) -> Result<Vec<Vec<F>>> {
    adjoint_jacobian_with(x, f, &JacobianConfig::default(), None)
}

/// [`adjoint_jacobian`] with an explicit configuration and optional tape.
pub fn adjoint_jacobian_with<F: TapeThreadLocal>(
    x: &[Reverse<F>],
    mut f: impl FnMut(&mut [Reverse<F>]) -> Vec<Reverse<F>>,
    config: &JacobianConfig,
    tape: Option<&mut Tape<F>>,
) -> Result<Vec<Vec<F>>> {
    tape::with_default_tape(tape, |tape| {
        adjoint::adjoint_sweeps(tape, x, &mut f, config.declared_codomain(), |shape| {
            Ok(RowSink::dense(shape))
        })
    })
    .map(RowSink::into_rows)
}

/// Full Jacobian of `f : R^n → R^m` in forward (tangent) mode.
///
/// Returns `J` with `J[i][j] = ∂f_i/∂x_j`, inferring the output count from
/// one unseeded evaluation.
///
/// ```
/// use jacobian_ad::{forward_jacobian, Dual};
///
/// let x = [Dual::constant(3.0_f64), Dual::constant(2.0)];
/// let jac = forward_jacobian(&x, |v| vec![v[0] * v[1], v[0] + v[1] * v[1]]).unwrap();
/// assert_eq!(jac, vec![vec![2.0, 3.0], vec![1.0, 4.0]]);
/// ```
pub fn forward_jacobian<F: Float>(
    x: &[Dual<F>],
    f: impl FnMut(&mut [Dual<F>]) -> Vec<Dual<F>>,
) -> Result<Vec<Vec<F>>> {
    forward_jacobian_with(x, f, &JacobianConfig::default())
}

/// [`forward_jacobian`] with an explicit configuration.
pub fn forward_jacobian_with<F: Float>(
    x: &[Dual<F>],
    mut f: impl FnMut(&mut [Dual<F>]) -> Vec<Dual<F>>,
    config: &JacobianConfig,
) -> Result<Vec<Vec<F>>> {
    forward::forward_sweeps(x, &mut f, config.declared_codomain(), |shape| {
        Ok(RowSink::dense(shape))
    })
    .map(RowSink::into_rows)
}

/// Parallel [`forward_jacobian_with`]; see
/// [`forward_jacobian_par_into`](crate::jacobian::forward_jacobian_par_into).
#[cfg(feature = "parallel")]
pub fn forward_jacobian_par<F: Float>(
    x: &[Dual<F>],
    f: impl Fn(&mut [Dual<F>]) -> Vec<Dual<F>> + Sync,
    config: &JacobianConfig,
) -> Result<Vec<Vec<F>>> {
    crate::jacobian::parallel::forward_par_sweeps(x, &f, config.declared_codomain(), |shape| {
        Ok(RowSink::dense(shape))
    })
    .map(RowSink::into_rows)
}
