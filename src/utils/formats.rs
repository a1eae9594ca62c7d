//! Conversions between our CSR views and `sprs` matrices

use sprs::CsMat;

use crate::error::{Result, SparseError};
use crate::matrix::csr::{CsrRef, RawCsr};
use crate::matrix::scalar::Scalar;

/// Copies a validated CSR view into a zero-based `sprs` CSR matrix
///
/// `sprs` requires strictly increasing columns within a row, so views that
/// are unsorted or hold duplicate entries are rejected with
/// [`SparseError::InvalidValue`].
pub fn to_sprs<T: Scalar>(csr: &CsrRef<'_, T>) -> Result<CsMat<T>> {
    let base = csr.base;
    let indptr: Vec<usize> = csr.row_ptr.iter().map(|&p| p - base).collect();
    let indices: Vec<usize> = csr.col_ind.iter().map(|&c| c - base).collect();
    let data = csr.values.to_vec();

    CsMat::try_new((csr.m, csr.n), indptr, indices, data)
        .map_err(|(_, _, _, e)| SparseError::InvalidValue(format!("sprs rejected matrix: {:?}", e)))
}

/// Borrows the arrays of a `sprs` CSR matrix as a zero-based raw triplet
///
/// Column-major matrices are rejected with [`SparseError::InvalidValue`].
pub fn raw_from_sprs<T>(matrix: &CsMat<T>) -> Result<RawCsr<'_, T>> {
    if !matrix.is_csr() {
        return Err(SparseError::InvalidValue(
            "expected a CSR matrix, got CSC".to_string(),
        ));
    }

    let (rows, cols) = matrix.shape();
    let (row_ptr, col_ind, values) = matrix.view().into_raw_storage();
    Ok(RawCsr::new(rows, cols, row_ptr, col_ind, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::descriptor::IndexBase;
    use crate::normalize::{optimize, validate};

    #[test]
    fn test_to_sprs_from_one_based() {
        let row_ptr = [1, 3, 4];
        let col_ind = [1, 2, 2];
        let values = [1.0, 2.0, 3.0];
        let raw = RawCsr::new(2, 2, &row_ptr, &col_ind, &values);
        let opt = optimize(&raw, IndexBase::One).unwrap();

        let mat = to_sprs(&opt.view()).unwrap();
        assert_eq!(mat.shape(), (2, 2));
        assert_eq!(mat.get(0, 1), Some(&2.0));
        assert_eq!(mat.get(1, 1), Some(&3.0));
        assert_eq!(mat.get(1, 0), None);
    }

    #[test]
    fn test_to_sprs_rejects_unsorted() {
        let row_ptr = [0, 2];
        let col_ind = [1, 0];
        let values = [1.0, 2.0];
        let raw = RawCsr::new(1, 2, &row_ptr, &col_ind, &values);
        let csr = validate(&raw, IndexBase::Zero).unwrap();

        assert!(matches!(to_sprs(&csr), Err(SparseError::InvalidValue(_))));
    }

    #[test]
    fn test_raw_from_sprs() {
        let mat = CsMat::new((2, 3), vec![0, 1, 3], vec![2, 0, 1], vec![1.0, 2.0, 3.0]);
        let raw = raw_from_sprs(&mat).unwrap();
        assert_eq!((raw.m, raw.n, raw.nnz), (2, 3, 3));
        assert_eq!(raw.col_ind, Some(&[2, 0, 1][..]));

        let csc = mat.to_csc();
        assert!(matches!(raw_from_sprs(&csc), Err(SparseError::InvalidValue(_))));
    }
}
