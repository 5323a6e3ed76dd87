//! Reverse-mode Jacobian: one recorded evaluation, one backward sweep per output.

use super::config::JacobianConfig;
use super::dims::{self, Shape};
use super::sink::RowSink;
use crate::error::Result;
use crate::reverse::Reverse;
use crate::tape::{self, Tape, TapeGuard, TapeThreadLocal};

/// Compute the Jacobian of `f` at `x` in adjoint mode, writing row `i` of the
/// result (`∂f_i/∂x_j` for all `j`) into the `i`-th of `rows`.
///
/// `tape` defaults to the thread's active tape, or to a temporary tape that is
/// dropped before returning. The tape is reset first, so values registered on
/// it earlier are invalidated and its size depends only on this computation.
///
/// Cost: one evaluation of `f` plus one backward sweep per output, independent
/// of the number of inputs. Prefer this mode when outputs ≤ inputs.
///
/// ```
/// use jacobian_ad::{adjoint_jacobian_into, JacobianConfig, Reverse};
///
/// let x = [Reverse::new(3.0_f64), Reverse::new(2.0)];
/// let mut jac = [[0.0; 2]; 2];
/// adjoint_jacobian_into(
///     &x,
///     |v| vec![v[0] * v[1], v[0] + v[1] * v[1]],
///     jac.iter_mut(),
///     &JacobianConfig::default(),
///     None,
/// )
/// .unwrap();
/// assert_eq!(jac, [[2.0, 3.0], [1.0, 4.0]]);
/// ```
pub fn adjoint_jacobian_into<F, R, I>(
    x: &[Reverse<F>],
    mut f: impl FnMut(&mut [Reverse<F>]) -> Vec<Reverse<F>>,
    rows: I,
    config: &JacobianConfig,
    tape: Option<&mut Tape<F>>,
) -> Result<()>
where
    F: TapeThreadLocal,
    R: AsMut<[F]>,
    I: IntoIterator<Item = R>,
{
    let sink = RowSink::bind(rows, x.len(), config.row_check)?;
    tape::with_default_tape(tape, |tape| {
        adjoint_sweeps(tape, x, &mut f, config.declared_codomain(), |shape| {
            sink.expect_rows(shape.codomain)?;
            Ok(sink)
        })
    })
    .map(drop)
}

/// Record `f` once on `tape`, then fill the sink produced by `bind` with one
/// backward sweep per output.
///
/// `bind` runs after the recorded evaluation (once the codomain is known) and
/// before the first sweep, so a rejected destination is never written.
pub(crate) fn adjoint_sweeps<F, R>(
    tape: &mut Tape<F>,
    x: &[Reverse<F>],
    f: &mut impl FnMut(&mut [Reverse<F>]) -> Vec<Reverse<F>>,
    declared: Option<usize>,
    bind: impl FnOnce(Shape) -> Result<RowSink<F, R>>,
) -> Result<RowSink<F, R>>
where
    F: TapeThreadLocal,
    R: AsMut<[F]>,
{
    let domain = x.len();

    let mut inputs = x.to_vec();
    tape.clear();
    tape.register_inputs(&mut inputs);
    tape.new_recording();

    // The function gets its own copy so that whatever it does to its
    // argument, the registered input slots stay readable.
    let mut working = inputs.clone();
    let mut outputs = {
        let _guard = TapeGuard::new(tape);
        f(&mut working)
    };

    let codomain = dims::resolve_codomain(declared, || outputs.len());
    dims::check_outputs(codomain, outputs.len())?;
    let mut sink = bind(Shape { codomain, domain })?;

    tape.register_outputs(&mut outputs);
    tracing::debug!(
        domain,
        codomain,
        statements = tape.num_statements(),
        "adjoint jacobian: recorded evaluation"
    );

    for (i, y) in outputs.iter().enumerate() {
        tape.set_derivative(y, F::one());
        tape.compute_adjoints();
        for (j, xj) in inputs.iter().enumerate() {
            sink.set_cell(i, j, tape.derivative(xj));
        }
        tape.clear_derivatives();
        tracing::trace!(row = i, "adjoint jacobian: backward sweep done");
    }

    Ok(sink)
}
