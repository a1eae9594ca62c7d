//! Symmetric kernel
//!
//! Only the triangle selected by the fill mode is read; entries stored in
//! the other triangle are ignored. Each off-diagonal entry `a_ij` is applied
//! twice, `y[i] += a_ij * x[j]` and the mirrored `y[j] += a_ij * x[i]`, so
//! rows scatter into each other.
//!
//! The serial kernel scales `y` by `beta` up front and scatters
//! `alpha`-scaled contributions straight into it. In parallel every thread
//! owns a zeroed cache-aligned buffer; buffers are summed pairwise as rayon
//! joins and `y = alpha * t + beta * y` is written once at the end.

use std::ops::Range;

use aligned_vec::AVec;
use rayon::prelude::*;

use super::{scale_y, store, Launch};
use crate::constants::CACHE_LINE_BYTES;
use crate::error::Result;
use crate::matrix::config::ExecContext;
use crate::matrix::descriptor::FillMode;
use crate::matrix::scalar::Scalar;
use crate::parallel::partition_rows;

/// Single-threaded symmetric product, in place in `y`
pub fn multiply<T: Scalar>(launch: &Launch<'_, T>, y: &mut [T]) -> Result<()> {
    let m = launch.csr.m;
    scale_y(launch.beta, &mut y[..m]);
    accumulate_rows(launch, 0..m, launch.alpha, y);
    Ok(())
}

/// Symmetric product with per-thread scatter buffers
pub fn multiply_parallel<T: Scalar>(
    launch: &Launch<'_, T>,
    y: &mut [T],
    ctx: &ExecContext,
) -> Result<()> {
    let m = launch.csr.m;
    let blocks = partition_rows(launch.csr.row_ptr, ctx.num_threads());
    let zeroed = || -> AVec<T> { AVec::from_iter(CACHE_LINE_BYTES, (0..m).map(|_| T::zero())) };

    let t = ctx.install(|| {
        blocks
            .par_iter()
            .fold(zeroed, |mut t, rows| {
                accumulate_rows(launch, rows.clone(), T::one(), &mut t);
                t
            })
            .reduce(zeroed, |mut a, b| {
                for (ai, &bi) in a.iter_mut().zip(b.iter()) {
                    *ai += bi;
                }
                a
            })
    });

    tracing::trace!(blocks = blocks.len(), "merged symmetric scatter buffers");
    finish(launch, &t, y);
    Ok(())
}

/// Adds `scale` times the contribution of `rows` to `t`, which spans all
/// `m` rows
fn accumulate_rows<T: Scalar>(
    launch: &Launch<'_, T>,
    rows: Range<usize>,
    scale: T,
    t: &mut [T],
) {
    let csr = &launch.csr;
    let x = launch.x;
    let base = csr.base;
    let unit = scale.is_one();

    for i in rows {
        let row = csr.row_range(i);
        let xi = x[i];
        // Mirrored terms carry the scale through x[i]
        let sxi = if unit { xi } else { scale * xi };
        let mut sum = T::zero();

        match launch.aux {
            // Sorted storage: the triangle is a contiguous segment
            Some(aux) => {
                let off_diagonal = match launch.fill_mode {
                    FillMode::Lower => aux.lower(row, i),
                    FillMode::Upper => aux.upper(row, i),
                };
                for k in off_diagonal {
                    let j = csr.col_ind[k] - base;
                    let a = csr.values[k];
                    sum += a * x[j];
                    t[j] += a * sxi;
                }
                for k in aux.diagonal(i) {
                    sum += csr.values[k] * xi;
                }
            }
            None => {
                for k in row {
                    let j = csr.col_ind[k] - base;
                    let a = csr.values[k];
                    let in_triangle = match launch.fill_mode {
                        FillMode::Lower => j < i,
                        FillMode::Upper => j > i,
                    };
                    if j == i {
                        sum += a * xi;
                    } else if in_triangle {
                        sum += a * x[j];
                        t[j] += a * sxi;
                    }
                }
            }
        }

        t[i] += if unit { sum } else { scale * sum };
    }
}

/// Writes `alpha * t + beta * y`
fn finish<T: Scalar>(launch: &Launch<'_, T>, t: &[T], y: &mut [T]) {
    for (yi, &ti) in y.iter_mut().zip(t) {
        store(yi, ti, launch.alpha, launch.beta);
    }
}
