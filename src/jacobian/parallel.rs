use rayon::prelude::*;

use super::config::JacobianConfig;
use super::dims::{self, Shape};
use super::forward::unseeded;
use super::sink::RowSink;
use crate::dual::Dual;
use crate::error::Result;
use crate::Float;

/// Parallel forward-mode Jacobian: the per-input tangent sweeps run on the
/// rayon thread pool.
///
/// Each worker evaluates `f` on a private copy of the input point, so `f` must
/// be `Fn + Sync`. The result equals [`forward_jacobian_into`](super::forward_jacobian_into);
/// every column's output length is checked, not only the first.
pub fn forward_jacobian_par_into<F, R, I>(
    x: &[Dual<F>],
    f: impl Fn(&mut [Dual<F>]) -> Vec<Dual<F>> + Sync,
    rows: I,
    config: &JacobianConfig,
) -> Result<()>
where
    F: Float,
    R: AsMut<[F]>,
    I: IntoIterator<Item = R>,
{
    let sink = RowSink::bind(rows, x.len(), config.row_check)?;
    forward_par_sweeps(x, &f, config.declared_codomain(), |shape| {
        sink.expect_rows(shape.codomain)?;
        Ok(sink)
    })
    .map(drop)
}

pub(crate) fn forward_par_sweeps<F, R>(
    x: &[Dual<F>],
    f: &(impl Fn(&mut [Dual<F>]) -> Vec<Dual<F>> + Sync),
    declared: Option<usize>,
    bind: impl FnOnce(Shape) -> Result<RowSink<F, R>>,
) -> Result<RowSink<F, R>>
where
    F: Float,
    R: AsMut<[F]>,
{
    let domain = x.len();
    let base = unseeded(x);

    let codomain = dims::resolve_codomain(declared, || f(&mut base.clone()).len());
    let mut sink = bind(Shape { codomain, domain })?;
    tracing::debug!(domain, codomain, "parallel forward jacobian: starting column sweeps");

    let columns: Vec<Vec<F>> = (0..domain)
        .into_par_iter()
        .map(|i| -> Result<Vec<F>> {
            let mut inputs = base.clone();
            inputs[i].eps = F::one();
            let outputs = f(&mut inputs);
            dims::check_outputs(codomain, outputs.len())?;
            Ok(outputs.iter().map(|y| y.eps).collect())
        })
        .collect::<Result<_>>()?;

    for (i, column) in columns.iter().enumerate() {
        for (j, &d) in column.iter().enumerate() {
            sink.set_cell(j, i, d);
        }
    }
    Ok(sink)
}
