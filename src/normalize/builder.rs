//! Owned CSR storage and its scoped builder
//!
//! [`CsrBuilder`] reserves every array up front with fallible allocation.
//! If any reservation fails the arrays already reserved are dropped with
//! the builder, so a failed normalization never leaks or half-commits.

use crate::error::{Result, SparseError};
use crate::matrix::csr::CsrRef;

/// Zero-based CSR arrays owned by the normalizer
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedCsr<T> {
    /// Number of rows
    pub m: usize,
    /// Number of columns
    pub n: usize,
    /// Row pointers (length `m + 1`, starting at 0)
    pub row_ptr: Vec<usize>,
    /// Column indices
    pub col_ind: Vec<usize>,
    /// Values
    pub values: Vec<T>,
}

impl<T> OwnedCsr<T> {
    /// Borrowed zero-based view
    pub fn view(&self) -> CsrRef<'_, T> {
        CsrRef {
            m: self.m,
            n: self.n,
            base: 0,
            row_ptr: &self.row_ptr,
            col_ind: &self.col_ind,
            values: &self.values,
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// Row-by-row writer for a fresh [`OwnedCsr`]
pub struct CsrBuilder<T> {
    m: usize,
    n: usize,
    row_ptr: Vec<usize>,
    col_ind: Vec<usize>,
    values: Vec<T>,
}

impl<T> CsrBuilder<T> {
    /// Reserves room for `m` rows and `nnz` entries
    pub fn with_capacity(m: usize, n: usize, nnz: usize) -> Result<Self> {
        let mut row_ptr = Vec::new();
        row_ptr.try_reserve_exact(m + 1)?;
        let mut col_ind = Vec::new();
        col_ind.try_reserve_exact(nnz)?;
        let mut values = Vec::new();
        values.try_reserve_exact(nnz)?;

        row_ptr.push(0);
        Ok(Self {
            m,
            n,
            row_ptr,
            col_ind,
            values,
        })
    }

    /// Appends an entry to the current row
    #[inline]
    pub fn push(&mut self, col: usize, val: T) {
        self.col_ind.push(col);
        self.values.push(val);
    }

    /// Closes the current row
    #[inline]
    pub fn end_row(&mut self) {
        self.row_ptr.push(self.col_ind.len());
    }

    /// Commits the arrays once every row has been closed
    pub fn finish(self) -> Result<OwnedCsr<T>> {
        if self.row_ptr.len() != self.m + 1 {
            return Err(SparseError::Internal(format!(
                "builder closed {} of {} rows",
                self.row_ptr.len() - 1,
                self.m
            )));
        }
        Ok(OwnedCsr {
            m: self.m,
            n: self.n,
            row_ptr: self.row_ptr,
            col_ind: self.col_ind,
            values: self.values,
        })
    }
}

/// Copies a validated view into fresh zero-based storage
///
/// Values are copied verbatim; row pointers and column indices lose the
/// input base.
pub fn copy<T: Copy>(csr: &CsrRef<'_, T>) -> Result<OwnedCsr<T>> {
    let mut builder = CsrBuilder::with_capacity(csr.m, csr.n, csr.nnz())?;
    for i in 0..csr.m {
        for (col, &val) in csr.row_iter(i) {
            builder.push(col, val);
        }
        builder.end_row();
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_shifts_one_based() {
        let row_ptr = [1, 3, 4];
        let col_ind = [3, 1, 2];
        let values = [1.0, 2.0, 3.0];
        let csr = CsrRef {
            m: 2,
            n: 3,
            base: 1,
            row_ptr: &row_ptr,
            col_ind: &col_ind,
            values: &values,
        };

        let owned = copy(&csr).unwrap();
        assert_eq!(owned.row_ptr, vec![0, 2, 3]);
        assert_eq!(owned.col_ind, vec![2, 0, 1]);
        assert_eq!(owned.values, vec![1.0, 2.0, 3.0]);
        assert_ne!(owned.values.as_ptr(), values.as_ptr());
    }

    #[test]
    fn test_builder_rejects_unclosed_rows() {
        let mut builder = CsrBuilder::<f64>::with_capacity(2, 2, 1).unwrap();
        builder.push(0, 1.0);
        builder.end_row();
        assert!(matches!(builder.finish(), Err(SparseError::Internal(_))));
    }

    #[test]
    fn test_builder_allocation_failure() {
        let result = CsrBuilder::<f64>::with_capacity(1, 1, usize::MAX / 2);
        assert!(matches!(result, Err(SparseError::MemoryError(_))));
    }
}
