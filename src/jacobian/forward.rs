//! Forward-mode Jacobian: one seeded evaluation per input.

use super::config::JacobianConfig;
use super::dims::{self, Shape};
use super::sink::RowSink;
use crate::dual::Dual;
use crate::error::Result;
use crate::Float;

/// Compute the Jacobian of `f` at `x` in forward mode, writing `∂f_i/∂x_j`
/// into column `j` of the `i`-th of `rows`.
///
/// Cost: one evaluation of `f` per input (plus one unseeded evaluation when
/// the codomain is not declared). No tape is involved. Prefer this mode when
/// inputs ≤ outputs.
///
/// Tangents carried by `x` are ignored; only the primal values matter.
pub fn forward_jacobian_into<F, R, I>(
    x: &[Dual<F>],
    mut f: impl FnMut(&mut [Dual<F>]) -> Vec<Dual<F>>,
    rows: I,
    config: &JacobianConfig,
) -> Result<()>
where
    F: Float,
    R: AsMut<[F]>,
    I: IntoIterator<Item = R>,
{
    let sink = RowSink::bind(rows, x.len(), config.row_check)?;
    forward_sweeps(x, &mut f, config.declared_codomain(), |shape| {
        sink.expect_rows(shape.codomain)?;
        Ok(sink)
    })
    .map(drop)
}

/// The working copy of `x`: same primals, all tangents zero.
pub(crate) fn unseeded<F: Float>(x: &[Dual<F>]) -> Vec<Dual<F>> {
    x.iter().map(|xi| Dual::constant(xi.re)).collect()
}

pub(crate) fn forward_sweeps<F, R>(
    x: &[Dual<F>],
    f: &mut impl FnMut(&mut [Dual<F>]) -> Vec<Dual<F>>,
    declared: Option<usize>,
    bind: impl FnOnce(Shape) -> Result<RowSink<F, R>>,
) -> Result<RowSink<F, R>>
where
    F: Float,
    R: AsMut<[F]>,
{
    let domain = x.len();
    let mut inputs = unseeded(x);

    let codomain = dims::resolve_codomain(declared, || f(&mut inputs).len());
    let mut sink = bind(Shape { codomain, domain })?;
    tracing::debug!(domain, codomain, "forward jacobian: starting column sweeps");

    for i in 0..domain {
        inputs[i].eps = F::one();
        let outputs = f(&mut inputs);
        if i == 0 {
            // The output length is fixed by the first seeded pass.
            dims::check_outputs(codomain, outputs.len())?;
        }
        inputs[i].eps = F::zero();

        for (j, y) in outputs.iter().take(codomain).enumerate() {
            sink.set_cell(j, i, y.eps);
        }
        tracing::trace!(column = i, "forward jacobian: tangent sweep done");
    }

    Ok(sink)
}
