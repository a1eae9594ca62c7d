//! Diagonal fill-in and row split tables
//!
//! Both operations require rows sorted by column.

use crate::error::Result;
use crate::matrix::csr::{AuxIndices, CsrRef};
use crate::normalize::builder::{CsrBuilder, OwnedCsr};

/// Inserts an explicit zero diagonal entry into every row `i < n` lacking one
///
/// The entry lands where it keeps the row sorted. A diagonal stored more
/// than once is merged into a single entry holding the sum. Returns the new
/// storage and the number of entries inserted; when every row already holds
/// exactly one diagonal entry the input is handed back untouched.
pub fn fill_diagonal<T: Copy + num_traits::Zero>(csr: OwnedCsr<T>) -> Result<(OwnedCsr<T>, usize)> {
    let view = csr.view();
    let mut missing = Vec::new();
    missing.try_reserve_exact(view.m)?;
    let mut repeated = 0;

    for i in 0..view.m {
        let mut found: usize = 0;
        for (col, _) in view.row_iter(i) {
            if col > i {
                break;
            }
            if col == i {
                found += 1;
            }
        }
        missing.push(found == 0 && i < view.n);
        repeated += found.saturating_sub(1);
    }

    let inserted = missing.iter().filter(|&&m| m).count();
    if inserted == 0 && repeated == 0 {
        return Ok((csr, 0));
    }

    let mut builder = CsrBuilder::with_capacity(view.m, view.n, view.nnz() + inserted - repeated)?;
    for (i, &needs_diag) in missing.iter().enumerate() {
        let mut pending = needs_diag;
        let mut diag: Option<T> = None;
        for (col, &val) in view.row_iter(i) {
            if col == i {
                diag = Some(diag.map_or(val, |d| d + val));
                continue;
            }
            if col > i {
                if pending {
                    builder.push(i, T::zero());
                    pending = false;
                }
                if let Some(d) = diag.take() {
                    builder.push(i, d);
                }
            }
            builder.push(col, val);
        }
        if let Some(d) = diag {
            builder.push(i, d);
        }
        // Empty rows and rows whose entries all sit left of the diagonal
        if pending {
            builder.push(i, T::zero());
        }
        builder.end_row();
    }

    tracing::debug!(inserted, repeated, "normalized diagonal entries");
    Ok((builder.finish()?, inserted))
}

/// Computes the diagonal and upper-triangle start position of every row
///
/// One forward scan per row: first to the first column `>= i`, then past
/// the columns equal to `i`.
pub fn build_aux_indices<T>(csr: &CsrRef<'_, T>) -> Result<AuxIndices> {
    let mut diag_position = Vec::new();
    diag_position.try_reserve_exact(csr.m)?;
    let mut upper_start = Vec::new();
    upper_start.try_reserve_exact(csr.m)?;

    for i in 0..csr.m {
        let range = csr.row_range(i);
        let cols = &csr.col_ind[range.clone()];

        let mut k = 0;
        while k < cols.len() && cols[k] - csr.base < i {
            k += 1;
        }
        diag_position.push(range.start + k);

        while k < cols.len() && cols[k] - csr.base == i {
            k += 1;
        }
        upper_start.push(range.start + k);
    }

    Ok(AuxIndices {
        diag_position,
        upper_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_diagonal_inserts_in_order() {
        // Row 0: diagonal missing before col 2
        // Row 1: empty
        // Row 2: only col 0, diagonal goes last
        let csr = OwnedCsr {
            m: 3,
            n: 3,
            row_ptr: vec![0, 1, 1, 2],
            col_ind: vec![2, 0],
            values: vec![5.0, 7.0],
        };

        let (filled, inserted) = fill_diagonal(csr).unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(filled.row_ptr, vec![0, 2, 3, 5]);
        assert_eq!(filled.col_ind, vec![0, 2, 1, 0, 2]);
        assert_eq!(filled.values, vec![0.0, 5.0, 0.0, 7.0, 0.0]);
    }

    #[test]
    fn test_fill_diagonal_merges_repeats() {
        // Row 0: diagonal stored twice; row 1: missing
        let csr = OwnedCsr {
            m: 2,
            n: 2,
            row_ptr: vec![0, 3, 4],
            col_ind: vec![0, 0, 1, 0],
            values: vec![1.0, 2.0, 5.0, 7.0],
        };

        let (filled, inserted) = fill_diagonal(csr).unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(filled.row_ptr, vec![0, 2, 4]);
        assert_eq!(filled.col_ind, vec![0, 1, 0, 1]);
        assert_eq!(filled.values, vec![3.0, 5.0, 7.0, 0.0]);
    }

    #[test]
    fn test_fill_diagonal_skips_rows_past_n() {
        // 3x2: row 2 has no diagonal column to fill
        let csr = OwnedCsr {
            m: 3,
            n: 2,
            row_ptr: vec![0, 1, 2, 3],
            col_ind: vec![0, 1, 1],
            values: vec![1.0, 2.0, 3.0],
        };

        let (filled, inserted) = fill_diagonal(csr.clone()).unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(filled, csr);
    }

    #[test]
    fn test_aux_indices() {
        let row_ptr = [0, 3, 4, 7];
        let col_ind = [0, 1, 2, 1, 0, 1, 2];
        let values = [1.0; 7];
        let csr = CsrRef {
            m: 3,
            n: 3,
            base: 0,
            row_ptr: &row_ptr,
            col_ind: &col_ind,
            values: &values,
        };

        let aux = build_aux_indices(&csr).unwrap();
        assert_eq!(aux.diag_position, vec![0, 3, 6]);
        assert_eq!(aux.upper_start, vec![1, 4, 7]);
    }

    #[test]
    fn test_aux_indices_one_based_without_diagonal() {
        // Row 0 holds only column 1 (one-based 2); no diagonal
        let row_ptr = [1, 2, 3];
        let col_ind = [2, 2];
        let values = [1.0, 1.0];
        let csr = CsrRef {
            m: 2,
            n: 2,
            base: 1,
            row_ptr: &row_ptr,
            col_ind: &col_ind,
            values: &values,
        };

        let aux = build_aux_indices(&csr).unwrap();
        assert_eq!(aux.diag_position, vec![0, 1]);
        assert_eq!(aux.upper_start, vec![0, 2]);
        assert!(aux.diagonal(0).is_empty());
        assert_eq!(aux.diagonal(1), 1..2);
    }
}
