//! # Sparse Matrix-Vector Products
//!
//! Entry points computing `y = alpha * op(A) * x + beta * y`.
//!
//! - [`csrmv`] and its per-precision wrappers run on a caller triplet and
//!   validate it on every call. Only zero-based indexing is accepted here.
//! - [`mv`] runs on a matrix handle. Once [`SparseMatrix::optimize`] has
//!   run, products use the normalized storage and its split tables;
//!   before that, the caller's arrays are validated and used directly,
//!   with either index base.
//!
//! All checks happen before `y` is touched: an `Err` leaves it unchanged.

use num_complex::{Complex32, Complex64};

use crate::error::{Result, SparseError};
use crate::kernels::{run, scale_y, select_kernel, Launch};
use crate::matrix::config::ExecContext;
use crate::matrix::csr::{AuxIndices, CsrRef, RawCsr, SparseMatrix};
use crate::matrix::descriptor::{IndexBase, MatDescr, MatrixType, Operation};
use crate::matrix::scalar::Scalar;
use crate::normalize::{dimension, validate};

/// Product with a raw CSR triplet
///
/// # Errors
///
/// Checks run in this order:
///
/// 1. one-based descriptor: [`SparseError::NotImplemented`]
/// 2. matrix type other than general or symmetric: `NotImplemented`
/// 3. any transpose: `NotImplemented`
/// 4. negative `m`, `n` or `nnz`: [`SparseError::InvalidSize`]
/// 5. `m == 0` returns `Ok` without touching `y`
/// 6. missing array or vector: [`SparseError::InvalidPointer`]
/// 7. short arrays or vectors ([`SparseError::InvalidSize`]) and broken
///    structure ([`SparseError::InvalidValue`])
#[allow(clippy::too_many_arguments)]
pub fn csrmv<T: Scalar>(
    trans: Operation,
    alpha: T,
    a: &RawCsr<'_, T>,
    descr: &MatDescr,
    x: Option<&[T]>,
    beta: T,
    y: Option<&mut [T]>,
    ctx: &ExecContext,
) -> Result<()> {
    if descr.base != IndexBase::Zero {
        return Err(SparseError::NotImplemented(
            "one-based indexing on the raw entry point",
        ));
    }
    check_request(trans, descr)?;

    let m = dimension(a.m, "m")?;
    dimension(a.n, "n")?;
    dimension(a.nnz, "nnz")?;
    if m == 0 {
        return Ok(());
    }

    let x = x.ok_or(SparseError::InvalidPointer("x"))?;
    let y = y.ok_or(SparseError::InvalidPointer("y"))?;
    let csr = validate(a, descr.base)?;

    execute(csr, None, descr, alpha, x, beta, y, ctx)
}

/// Single-precision real [`csrmv`]
#[allow(clippy::too_many_arguments)]
pub fn scsrmv(
    trans: Operation,
    alpha: f32,
    a: &RawCsr<'_, f32>,
    descr: &MatDescr,
    x: Option<&[f32]>,
    beta: f32,
    y: Option<&mut [f32]>,
    ctx: &ExecContext,
) -> Result<()> {
    csrmv(trans, alpha, a, descr, x, beta, y, ctx)
}

/// Double-precision real [`csrmv`]
#[allow(clippy::too_many_arguments)]
pub fn dcsrmv(
    trans: Operation,
    alpha: f64,
    a: &RawCsr<'_, f64>,
    descr: &MatDescr,
    x: Option<&[f64]>,
    beta: f64,
    y: Option<&mut [f64]>,
    ctx: &ExecContext,
) -> Result<()> {
    csrmv(trans, alpha, a, descr, x, beta, y, ctx)
}

/// Single-precision complex [`csrmv`]
#[allow(clippy::too_many_arguments)]
pub fn ccsrmv(
    trans: Operation,
    alpha: Complex32,
    a: &RawCsr<'_, Complex32>,
    descr: &MatDescr,
    x: Option<&[Complex32]>,
    beta: Complex32,
    y: Option<&mut [Complex32]>,
    ctx: &ExecContext,
) -> Result<()> {
    csrmv(trans, alpha, a, descr, x, beta, y, ctx)
}

/// Double-precision complex [`csrmv`]
#[allow(clippy::too_many_arguments)]
pub fn zcsrmv(
    trans: Operation,
    alpha: Complex64,
    a: &RawCsr<'_, Complex64>,
    descr: &MatDescr,
    x: Option<&[Complex64]>,
    beta: Complex64,
    y: Option<&mut [Complex64]>,
    ctx: &ExecContext,
) -> Result<()> {
    csrmv(trans, alpha, a, descr, x, beta, y, ctx)
}

/// Product with a matrix handle
///
/// # Errors
///
/// [`SparseError::NotImplemented`] for unsupported matrix types or any
/// transpose, [`SparseError::WrongType`] when the handle holds another
/// precision than `T`, and [`SparseError::InvalidValue`] when the
/// descriptor base differs from the handle's. Handles that were never
/// optimized are validated as in [`csrmv`].
#[allow(clippy::too_many_arguments)]
pub fn mv<T: Scalar>(
    trans: Operation,
    alpha: T,
    a: &SparseMatrix<'_>,
    descr: &MatDescr,
    x: &[T],
    beta: T,
    y: &mut [T],
    ctx: &ExecContext,
) -> Result<()> {
    check_request(trans, descr)?;

    let matrix = a.typed::<T>()?;
    if descr.base != matrix.base() {
        return Err(SparseError::InvalidValue(format!(
            "descriptor base {:?} does not match matrix base {:?}",
            descr.base,
            matrix.base()
        )));
    }

    match matrix.optimized() {
        Some(opt) => execute(opt.view(), Some(opt.aux()), descr, alpha, x, beta, y, ctx),
        None => {
            let csr = matrix.validated()?;
            execute(csr, None, descr, alpha, x, beta, y, ctx)
        }
    }
}

/// Rejects matrix types and operations no kernel implements
fn check_request(trans: Operation, descr: &MatDescr) -> Result<()> {
    match descr.matrix_type {
        MatrixType::General | MatrixType::Symmetric => {}
        MatrixType::Hermitian | MatrixType::Triangular => {
            return Err(SparseError::NotImplemented(
                "matrix types other than general and symmetric",
            ))
        }
    }
    if trans != Operation::None {
        return Err(SparseError::NotImplemented("transposed products"));
    }
    Ok(())
}

/// Checks the vectors against a validated matrix, then dispatches
#[allow(clippy::too_many_arguments)]
fn execute<T: Scalar>(
    csr: CsrRef<'_, T>,
    aux: Option<&AuxIndices>,
    descr: &MatDescr,
    alpha: T,
    x: &[T],
    beta: T,
    y: &mut [T],
    ctx: &ExecContext,
) -> Result<()> {
    let (m, n, nnz) = (csr.m, csr.n, csr.nnz());

    if x.len() < n {
        return Err(SparseError::InvalidSize(format!(
            "x holds {} entries, need {}",
            x.len(),
            n
        )));
    }
    if y.len() < m {
        return Err(SparseError::InvalidSize(format!(
            "y holds {} entries, need {}",
            y.len(),
            m
        )));
    }
    if descr.matrix_type == MatrixType::Symmetric && m != n {
        return Err(SparseError::InvalidSize(format!(
            "symmetric matrix must be square, got {} x {}",
            m, n
        )));
    }
    if m == 0 {
        return Ok(());
    }

    let y = &mut y[..m];
    if n == 0 || nnz == 0 || alpha.is_zero() {
        tracing::trace!(m, n, nnz, "no products to form, scaling y");
        scale_y(beta, y);
        return Ok(());
    }

    let kernel = select_kernel::<T>(m, nnz, descr.matrix_type, ctx);
    let launch = Launch {
        csr,
        aux,
        fill_mode: descr.fill_mode,
        alpha,
        beta,
        x,
    };
    run(kernel, &launch, y, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::csr::CsrMatrix;

    const ROW_PTR: [usize; 6] = [0, 2, 3, 4, 7, 8];
    const COL_IND: [usize; 8] = [0, 3, 1, 2, 1, 3, 4, 4];
    const VALUES: [f64; 8] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];

    #[test]
    fn test_csrmv_worked_example() {
        let a = RawCsr::new(5, 5, &ROW_PTR, &COL_IND, &VALUES);
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let mut y = [0.0; 5];

        dcsrmv(
            Operation::None,
            1.0,
            &a,
            &MatDescr::general(),
            Some(&x),
            0.0,
            Some(&mut y),
            &ExecContext::serial(),
        )
        .unwrap();

        assert_eq!(y, [9.0, 6.0, 4.0, 59.0, 40.0]);
    }

    #[test]
    fn test_csrmv_alpha_zero_ignores_matrix() {
        let values = [f64::NAN; 8];
        let a = RawCsr::new(5, 5, &ROW_PTR, &COL_IND, &values);
        let x = [f64::NAN; 5];
        let mut y = [1.0, 2.0, 3.0, 4.0, 5.0];

        csrmv(
            Operation::None,
            0.0,
            &a,
            &MatDescr::general(),
            Some(&x),
            2.0,
            Some(&mut y),
            &ExecContext::serial(),
        )
        .unwrap();

        assert_eq!(y, [2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_csrmv_rejects_one_based_descriptor() {
        let a = RawCsr::new(5, 5, &ROW_PTR, &COL_IND, &VALUES);
        let x = [1.0; 5];
        let mut y = [0.0; 5];
        let descr = MatDescr::general().with_base(IndexBase::One);

        let result = csrmv(
            Operation::None,
            1.0,
            &a,
            &descr,
            Some(&x),
            0.0,
            Some(&mut y),
            &ExecContext::serial(),
        );
        assert!(matches!(result, Err(SparseError::NotImplemented(_))));
        assert_eq!(y, [0.0; 5]);
    }

    #[test]
    fn test_mv_before_and_after_optimize() {
        // Same worked example, stored one-based
        let row_ptr: Vec<usize> = ROW_PTR.iter().map(|p| p + 1).collect();
        let col_ind: Vec<usize> = COL_IND.iter().map(|c| c + 1).collect();
        let raw = RawCsr::new(5, 5, &row_ptr, &col_ind, &VALUES);
        let mut matrix: SparseMatrix = CsrMatrix::new(IndexBase::One, raw).into();

        let descr = MatDescr::general().with_base(IndexBase::One);
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ctx = ExecContext::serial();

        let mut y = [0.0; 5];
        mv(Operation::None, 1.0, &matrix, &descr, &x, 0.0, &mut y, &ctx).unwrap();
        assert_eq!(y, [9.0, 6.0, 4.0, 59.0, 40.0]);

        matrix.optimize().unwrap();
        let mut y = [0.0; 5];
        mv(Operation::None, 1.0, &matrix, &descr, &x, 0.0, &mut y, &ctx).unwrap();
        assert_eq!(y, [9.0, 6.0, 4.0, 59.0, 40.0]);
    }

    #[test]
    fn test_mv_base_mismatch() {
        let raw = RawCsr::new(5, 5, &ROW_PTR, &COL_IND, &VALUES);
        let matrix: SparseMatrix = CsrMatrix::new(IndexBase::Zero, raw).into();
        let descr = MatDescr::general().with_base(IndexBase::One);
        let mut y = [0.0; 5];

        let result = mv(
            Operation::None,
            1.0,
            &matrix,
            &descr,
            &[1.0; 5],
            0.0,
            &mut y,
            &ExecContext::serial(),
        );
        assert!(matches!(result, Err(SparseError::InvalidValue(_))));
    }
}
