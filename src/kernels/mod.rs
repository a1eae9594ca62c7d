//! # SpMV Kernels
//!
//! Computes `y = alpha * A * x + beta * y` over a validated [`CsrRef`].
//!
//! ## Kernel Selection
//!
//! - **Symmetric**: any matrix described as symmetric, whatever its density
//! - **Scalar rows**: general matrices with at most
//!   [`DENSITY_THRESHOLD`](crate::constants::DENSITY_THRESHOLD) nonzeros per
//!   row on average, and every complex matrix
//! - **Lanes**: denser real matrices, 4 or 8 lanes wide depending on the
//!   precision and [`ExecContext::wide_simd`]
//!
//! Every kernel produces the same result up to floating-point reassociation.
//!
//! ## Threading
//!
//! Products with enough nonzeros run in the context's worker pool. General
//! kernels write disjoint row blocks of `y`; the symmetric kernel scatters
//! into per-thread buffers that are summed once at the end.

#[cfg(target_arch = "x86_64")]
pub mod avx2;
pub mod lanes;
pub mod scalar_rows;
pub mod symmetric;

use std::ops::Range;

use rayon::prelude::*;

use crate::constants::{DENSITY_THRESHOLD, NARROW_LANES, PARALLEL_MIN_NNZ, WIDE_LANES};
use crate::error::Result;
use crate::matrix::config::ExecContext;
use crate::matrix::csr::{AuxIndices, CsrRef};
use crate::matrix::descriptor::{FillMode, MatrixType};
use crate::matrix::scalar::Scalar;
use crate::parallel::{partition_rows, split_blocks_mut};

pub use lanes::row_dot_lanes;
pub use scalar_rows::row_dot_scalar;

/// Reduction of one row against `x`: `(values, columns, x, base)`
pub type RowDot<T> = fn(&[T], &[usize], &[T], usize) -> T;

/// Accumulator width of the vector kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneWidth {
    /// 256-bit registers holding `f64`
    Four,
    /// 256-bit `f32` or 512-bit `f64`
    Eight,
}

/// The computation chosen for one product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    /// One multiply-add per entry
    ScalarRows,
    /// Row reduction over a fixed number of lanes
    Lanes(LaneWidth),
    /// Single stored triangle, mirrored on the fly
    Symmetric,
}

/// Picks the kernel for a matrix of `m` rows and `nnz` entries
pub fn select_kernel<T: Scalar>(
    m: usize,
    nnz: usize,
    matrix_type: MatrixType,
    ctx: &ExecContext,
) -> Kernel {
    if matrix_type == MatrixType::Symmetric {
        return Kernel::Symmetric;
    }
    if nnz <= DENSITY_THRESHOLD.saturating_mul(m) {
        return Kernel::ScalarRows;
    }
    match T::lane_width(ctx.wide_simd()) {
        Some(width) => Kernel::Lanes(width),
        None => Kernel::ScalarRows,
    }
}

/// Row reduction implementing a general kernel
///
/// Lane kernels use the CPU-specific routine when one is available.
pub fn row_dot_for<T: Scalar>(kernel: Kernel) -> RowDot<T> {
    match kernel {
        Kernel::Lanes(width) => T::native_row_dot(width).unwrap_or(match width {
            LaneWidth::Four => row_dot_lanes::<T, { NARROW_LANES }>,
            LaneWidth::Eight => row_dot_lanes::<T, { WIDE_LANES }>,
        }),
        Kernel::ScalarRows | Kernel::Symmetric => row_dot_scalar::<T>,
    }
}

/// Inputs of one product, apart from the output vector
#[derive(Debug, Clone, Copy)]
pub struct Launch<'k, T> {
    /// Matrix view; sorted when `aux` is present
    pub csr: CsrRef<'k, T>,
    /// Row split tables of a sorted matrix
    pub aux: Option<&'k AuxIndices>,
    /// Stored triangle read by the symmetric kernel
    pub fill_mode: FillMode,
    /// Scale applied to `A * x`
    pub alpha: T,
    /// Scale applied to the incoming `y`
    pub beta: T,
    /// Input vector, at least `n` long
    pub x: &'k [T],
}

/// Runs `kernel` and writes the first `m` entries of `y`
///
/// `y` must hold at least `m` entries.
pub fn run<T: Scalar>(
    kernel: Kernel,
    launch: &Launch<'_, T>,
    y: &mut [T],
    ctx: &ExecContext,
) -> Result<()> {
    let m = launch.csr.m;
    let nnz = launch.csr.nnz();
    let y = &mut y[..m];
    let parallel = ctx.num_threads() > 1 && nnz >= PARALLEL_MIN_NNZ;

    tracing::trace!(?kernel, m, nnz, parallel, "running kernel");

    match kernel {
        Kernel::Symmetric if parallel => symmetric::multiply_parallel(launch, y, ctx),
        Kernel::Symmetric => symmetric::multiply(launch, y),
        Kernel::ScalarRows | Kernel::Lanes(_) => {
            let row_dot = row_dot_for::<T>(kernel);
            if parallel {
                let blocks = partition_rows(launch.csr.row_ptr, ctx.num_threads());
                ctx.install(|| {
                    split_blocks_mut(y, &blocks)
                        .into_par_iter()
                        .for_each(|(rows, ys)| multiply_rows(launch, row_dot, rows, ys));
                });
            } else {
                multiply_rows(launch, row_dot, 0..m, y);
            }
            Ok(())
        }
    }
}

/// General kernel over `rows`; `ys[k]` is the output of row `rows.start + k`
fn multiply_rows<T: Scalar>(
    launch: &Launch<'_, T>,
    row_dot: RowDot<T>,
    rows: Range<usize>,
    ys: &mut [T],
) {
    let csr = &launch.csr;
    for (i, yi) in rows.zip(ys.iter_mut()) {
        let range = csr.row_range(i);
        let sum = row_dot(
            &csr.values[range.clone()],
            &csr.col_ind[range],
            launch.x,
            csr.base,
        );
        store(yi, sum, launch.alpha, launch.beta);
    }
}

/// Writes `alpha * sum + beta * yi`
///
/// `yi` is not read when `beta` is zero, and `sum` is not scaled when
/// `alpha` is one.
#[inline]
pub(crate) fn store<T: Scalar>(yi: &mut T, sum: T, alpha: T, beta: T) {
    let scaled = if alpha.is_one() { sum } else { alpha * sum };
    *yi = if beta.is_zero() {
        scaled
    } else {
        scaled + beta * *yi
    };
}

/// `y = beta * y`; zero-fills without reading when `beta` is zero
pub(crate) fn scale_y<T: Scalar>(beta: T, y: &mut [T]) {
    if beta.is_zero() {
        y.fill(T::zero());
    } else if !beta.is_one() {
        for yi in y.iter_mut() {
            *yi = beta * *yi;
        }
    }
}
