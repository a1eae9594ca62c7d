//! # CSR Normalization
//!
//! Turns an arbitrary caller triplet into the canonical form every kernel
//! relies on: rows sorted by column, an explicit entry on each diagonal
//! position `i < n`, and per-row split tables for symmetric execution.
//!
//! ## Pipeline
//!
//! 1. [`validate`] the raw triplet (sizes, arrays, structure)
//! 2. [`check_sorted_and_diagonal`] with a read-only probe
//! 3. alias the caller's arrays when already clean, else [`copy`] them
//! 4. [`sort_rows`] if any row is out of order
//! 5. [`fill_diagonal`] if any diagonal entry is missing
//! 6. [`build_aux_indices`]
//!
//! Clean input costs no allocation beyond the split tables. Any other
//! input is copied once into zero-based storage, and every later step works
//! on that copy, so the index base is corrected exactly once.

pub mod builder;
pub mod diag;
pub mod sort;

use std::borrow::Cow;

use crate::error::{Result, SparseError};
use crate::matrix::csr::{CsrRef, OptimizedCsr, RawCsr};
use crate::matrix::descriptor::IndexBase;
use crate::matrix::scalar::Scalar;

pub use builder::{copy, CsrBuilder, OwnedCsr};
pub use diag::{build_aux_indices, fill_diagonal};
pub use sort::sort_rows;

/// Result of the read-only structure probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStructure {
    /// Every row has non-decreasing column indices
    pub sorted: bool,
    /// Every row `i < n` holds exactly one column-`i` entry
    pub full_diagonal: bool,
}

/// Converts a signed dimension, rejecting negatives
pub(crate) fn dimension(value: isize, name: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| SparseError::InvalidSize(format!("{} must be non-negative, got {}", name, value)))
}

/// Checks a raw triplet and returns a trusted view of it
///
/// Sizes are checked first, then array presence, then lengths, then
/// structure: `row_ptr` starts at the base, never decreases and spans
/// exactly `nnz` entries, and every column lies in `[base, n - 1 + base]`.
pub fn validate<'a, T>(raw: &RawCsr<'a, T>, base: IndexBase) -> Result<CsrRef<'a, T>> {
    let m = dimension(raw.m, "m")?;
    let n = dimension(raw.n, "n")?;
    let nnz = dimension(raw.nnz, "nnz")?;

    let row_ptr = raw.row_ptr.ok_or(SparseError::InvalidPointer("row_ptr"))?;
    let col_ind = raw.col_ind.ok_or(SparseError::InvalidPointer("col_ind"))?;
    let values = raw.values.ok_or(SparseError::InvalidPointer("values"))?;

    if row_ptr.len() < m + 1 {
        return Err(SparseError::InvalidSize(format!(
            "row_ptr holds {} entries, need {}",
            row_ptr.len(),
            m + 1
        )));
    }
    if col_ind.len() < nnz || values.len() < nnz {
        return Err(SparseError::InvalidSize(format!(
            "col_ind/values hold {}/{} entries, need {}",
            col_ind.len(),
            values.len(),
            nnz
        )));
    }

    let offset = base.offset();
    let row_ptr = &row_ptr[..=m];
    let col_ind = &col_ind[..nnz];
    let values = &values[..nnz];

    if row_ptr[0] != offset {
        return Err(SparseError::InvalidValue(format!(
            "row_ptr[0] is {}, expected index base {}",
            row_ptr[0], offset
        )));
    }
    if let Some(i) = row_ptr.windows(2).position(|w| w[1] < w[0]) {
        return Err(SparseError::InvalidValue(format!(
            "row_ptr decreases at row {}",
            i
        )));
    }
    if row_ptr[m] - offset != nnz {
        return Err(SparseError::InvalidValue(format!(
            "row_ptr spans {} entries, nnz is {}",
            row_ptr[m] - offset,
            nnz
        )));
    }
    if let Some(&col) = col_ind.iter().find(|&&c| c < offset || c - offset >= n) {
        return Err(SparseError::InvalidValue(format!(
            "column index {} outside [{}, {}]",
            col,
            offset,
            (n + offset).saturating_sub(1)
        )));
    }

    Ok(CsrRef {
        m,
        n,
        base: offset,
        row_ptr,
        col_ind,
        values,
    })
}

/// Probes whether rows are sorted and the diagonal is complete
///
/// Never mutates its input.
pub fn check_sorted_and_diagonal<T>(csr: &CsrRef<'_, T>) -> RowStructure {
    let mut structure = RowStructure {
        sorted: true,
        full_diagonal: true,
    };

    for i in 0..csr.m {
        let cols = &csr.col_ind[csr.row_range(i)];
        let mut diag_entries = 0;

        for (k, &col) in cols.iter().enumerate() {
            if k > 0 && cols[k - 1] > col {
                structure.sorted = false;
            }
            if col - csr.base == i {
                diag_entries += 1;
            }
        }

        if i < csr.n && diag_entries != 1 {
            structure.full_diagonal = false;
        }
        if !structure.sorted && !structure.full_diagonal {
            break;
        }
    }

    structure
}

/// Builds the optimized form of a raw triplet
///
/// A row storing its diagonal more than once is not clean: the copy keeps
/// a single diagonal entry holding the sum of the repeats.
pub fn optimize<'a, T: Scalar>(raw: &RawCsr<'a, T>, base: IndexBase) -> Result<OptimizedCsr<'a, T>> {
    let csr = validate(raw, base)?;
    let structure = check_sorted_and_diagonal(&csr);

    tracing::debug!(
        m = csr.m,
        n = csr.n,
        nnz = csr.nnz(),
        sorted = structure.sorted,
        full_diagonal = structure.full_diagonal,
        "optimizing CSR matrix"
    );

    if structure.sorted && structure.full_diagonal {
        // Caller's arrays are used as-is; kernels correct the base at run time
        let aux = build_aux_indices(&csr)?;
        tracing::debug!("aliasing caller storage");
        return Ok(OptimizedCsr {
            m: csr.m,
            n: csr.n,
            base: csr.base,
            row_ptr: Cow::Borrowed(csr.row_ptr),
            col_ind: Cow::Borrowed(csr.col_ind),
            values: Cow::Borrowed(csr.values),
            aux,
            user_full_diag: true,
            inserted_diagonals: 0,
        });
    }

    let mut owned = copy(&csr)?;
    if !structure.sorted {
        owned = sort_rows(owned);
    }

    let resorted = check_sorted_and_diagonal(&owned.view());
    if !resorted.sorted {
        return Err(SparseError::Internal("rows unsorted after sort_rows".into()));
    }

    let (owned, inserted_diagonals) = if resorted.full_diagonal {
        (owned, 0)
    } else {
        fill_diagonal(owned)?
    };
    let aux = build_aux_indices(&owned.view())?;

    let OwnedCsr {
        m,
        n,
        row_ptr,
        col_ind,
        values,
    } = owned;

    Ok(OptimizedCsr {
        m,
        n,
        base: 0,
        row_ptr: Cow::Owned(row_ptr),
        col_ind: Cow::Owned(col_ind),
        values: Cow::Owned(values),
        aux,
        user_full_diag: structure.full_diagonal,
        inserted_diagonals,
    })
}
