//! Row-addressable destination for Jacobian cells.

use std::marker::PhantomData;

use super::config::RowCheck;
use super::dims::Shape;
use crate::error::{Error, Extent, Result};
use crate::Float;

/// A sequence of destination rows bound to a Jacobian shape.
///
/// Rows are anything exposing `&mut [F]`: `&mut Vec<F>`, `&mut [F; N]`, or
/// the slices of a flat buffer's `chunks_mut`. Rows need not be contiguous
/// with each other.
pub struct RowSink<F, R> {
    rows: Vec<R>,
    _cell: PhantomData<F>,
}

impl<F: Float, R: AsMut<[F]>> RowSink<F, R> {
    /// Collect `rows` and check their widths against `domain`.
    ///
    /// The row count can only be checked once the codomain is known; see
    /// [`expect_rows`](RowSink::expect_rows).
    pub fn bind<I>(rows: I, domain: usize, check: RowCheck) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
    {
        let mut rows: Vec<R> = rows.into_iter().collect();
        let checked = match check {
            RowCheck::First => rows.len().min(1),
            RowCheck::All => rows.len(),
        };
        for (row, r) in rows.iter_mut().take(checked).enumerate() {
            let width = r.as_mut().len();
            if width != domain {
                return Err(Error::mismatch(Extent::Columns { row }, domain, width));
            }
        }
        Ok(RowSink {
            rows,
            _cell: PhantomData,
        })
    }

    /// Check that exactly `codomain` rows were supplied.
    pub fn expect_rows(&self, codomain: usize) -> Result<()> {
        if self.rows.len() != codomain {
            return Err(Error::mismatch(Extent::Rows, codomain, self.rows.len()));
        }
        Ok(())
    }

    /// Number of rows supplied.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Write `value` into cell `(row, col)`.
    #[inline]
    pub fn set_cell(&mut self, row: usize, col: usize, value: F) {
        self.rows[row].as_mut()[col] = value;
    }

    /// Give the rows back.
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

impl<F: Float> RowSink<F, Vec<F>> {
    /// A freshly allocated, zero-filled dense matrix of the given shape.
    pub fn dense(shape: Shape) -> Self {
        RowSink {
            rows: vec![vec![F::zero(); shape.domain]; shape.codomain],
            _cell: PhantomData,
        }
    }
}
