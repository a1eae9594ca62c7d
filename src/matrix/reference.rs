//! Dense reference implementation of SpMV
//!
//! This provides a baseline for correctness testing. The sparse matrix is
//! expanded into an `ndarray` dense matrix and multiplied the textbook way.

use ndarray::{Array1, Array2};

use crate::matrix::csr::CsrRef;
use crate::matrix::descriptor::FillMode;
use crate::matrix::scalar::Scalar;

/// Expands a CSR view into a dense matrix, summing duplicate entries
pub fn to_dense<T: Scalar>(csr: &CsrRef<'_, T>) -> Array2<T> {
    let mut dense = Array2::from_elem((csr.m, csr.n), T::zero());
    for i in 0..csr.m {
        for (j, &val) in csr.row_iter(i) {
            dense[[i, j]] += val;
        }
    }
    dense
}

/// Expands one stored triangle of a symmetric matrix into its full dense form
///
/// Entries outside the stored triangle are ignored.
pub fn to_dense_symmetric<T: Scalar>(csr: &CsrRef<'_, T>, fill_mode: FillMode) -> Array2<T> {
    let mut dense = Array2::from_elem((csr.m, csr.n), T::zero());
    for i in 0..csr.m {
        for (j, &val) in csr.row_iter(i) {
            let stored = match fill_mode {
                FillMode::Lower => j <= i,
                FillMode::Upper => j >= i,
            };
            if !stored {
                continue;
            }
            dense[[i, j]] += val;
            if i != j {
                dense[[j, i]] += val;
            }
        }
    }
    dense
}

/// Computes `alpha * a @ x + beta * y` on dense operands
pub fn dense_spmv<T: Scalar>(alpha: T, a: &Array2<T>, x: &[T], beta: T, y: &[T]) -> Vec<T> {
    let x = Array1::from(x.to_vec());
    let (rows, cols) = a.dim();
    let mut result = Vec::with_capacity(rows);

    for i in 0..rows {
        let mut sum = T::zero();
        for j in 0..cols {
            sum += a[[i, j]] * x[j];
        }
        let beta_term = if beta.is_zero() { T::zero() } else { beta * y[i] };
        result.push(alpha * sum + beta_term);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_expansion_sums_duplicates() {
        let row_ptr = [0, 3, 4];
        let col_ind = [1, 0, 1, 1];
        let values = [1.0, 2.0, 3.0, 4.0];
        let csr = CsrRef {
            m: 2,
            n: 2,
            base: 0,
            row_ptr: &row_ptr,
            col_ind: &col_ind,
            values: &values,
        };

        let dense = to_dense(&csr);
        assert_eq!(dense[[0, 0]], 2.0);
        assert_eq!(dense[[0, 1]], 4.0);
        assert_eq!(dense[[1, 0]], 0.0);
        assert_eq!(dense[[1, 1]], 4.0);
    }

    #[test]
    fn test_symmetric_expansion() {
        // Lower triangle of
        // [2 1]
        // [1 3]
        let row_ptr = [0, 1, 3];
        let col_ind = [0, 0, 1];
        let values = [2.0, 1.0, 3.0];
        let csr = CsrRef {
            m: 2,
            n: 2,
            base: 0,
            row_ptr: &row_ptr,
            col_ind: &col_ind,
            values: &values,
        };

        let dense = to_dense_symmetric(&csr, FillMode::Lower);
        assert_eq!(dense[[0, 1]], 1.0);
        assert_eq!(dense[[1, 0]], 1.0);

        // Reading the same arrays as the upper triangle keeps only the diagonal
        let upper = to_dense_symmetric(&csr, FillMode::Upper);
        assert_eq!(upper[[0, 1]], 0.0);
        assert_eq!(upper[[1, 1]], 3.0);
    }

    #[test]
    fn test_dense_spmv() {
        let a = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 0.0, 3.0]).unwrap();
        let y = dense_spmv(2.0, &a, &[1.0, 1.0], 1.0, &[10.0, 20.0]);
        assert_eq!(y, vec![16.0, 26.0]);
    }
}
