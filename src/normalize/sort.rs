//! Per-row column sorting
//!
//! Each row is permuted independently, so large matrices sort their rows
//! in parallel.

use rayon::prelude::*;

use crate::constants::PARALLEL_SORT_MIN_NNZ;
use crate::normalize::builder::OwnedCsr;
use crate::parallel::split_rows_mut;

/// Sorts every row by ascending column index
///
/// Entries with equal columns keep their original relative order, and each
/// row's multiset of `(column, value)` pairs is unchanged.
pub fn sort_rows<T: Copy + Send>(mut csr: OwnedCsr<T>) -> OwnedCsr<T> {
    let parallel = csr.nnz() >= PARALLEL_SORT_MIN_NNZ;
    let segments = split_rows_mut(&csr.row_ptr, &mut csr.col_ind, &mut csr.values);

    if parallel {
        segments
            .into_par_iter()
            .for_each(|(cols, vals)| sort_segment(cols, vals));
    } else {
        for (cols, vals) in segments {
            sort_segment(cols, vals);
        }
    }

    csr
}

/// Sorts one row through a permutation of its positions
fn sort_segment<T: Copy>(cols: &mut [usize], vals: &mut [T]) {
    if cols.windows(2).all(|w| w[0] <= w[1]) {
        return;
    }

    // Stable sort keeps ties in input order
    let mut perm: Vec<usize> = (0..cols.len()).collect();
    perm.sort_by_key(|&p| cols[p]);

    let sorted_cols: Vec<usize> = perm.iter().map(|&p| cols[p]).collect();
    let sorted_vals: Vec<T> = perm.iter().map(|&p| vals[p]).collect();
    cols.copy_from_slice(&sorted_cols);
    vals.copy_from_slice(&sorted_vals);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_rows() {
        let csr = OwnedCsr {
            m: 2,
            n: 4,
            row_ptr: vec![0, 3, 5],
            col_ind: vec![3, 0, 2, 1, 0],
            values: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        };

        let sorted = sort_rows(csr);
        assert_eq!(sorted.row_ptr, vec![0, 3, 5]);
        assert_eq!(sorted.col_ind, vec![0, 2, 3, 0, 1]);
        assert_eq!(sorted.values, vec![2.0, 3.0, 1.0, 5.0, 4.0]);
    }

    #[test]
    fn test_sort_is_stable_for_duplicates() {
        let csr = OwnedCsr {
            m: 1,
            n: 3,
            row_ptr: vec![0, 4],
            col_ind: vec![2, 1, 2, 1],
            values: vec![10, 20, 30, 40],
        };

        let sorted = sort_rows(csr);
        assert_eq!(sorted.col_ind, vec![1, 1, 2, 2]);
        assert_eq!(sorted.values, vec![20, 40, 10, 30]);
    }

    #[test]
    fn test_sort_large_matrix_in_parallel() {
        let m = 2048;
        let per_row = 16;
        let mut row_ptr = vec![0];
        let mut col_ind = Vec::new();
        let mut values = Vec::new();
        for i in 0..m {
            for k in 0..per_row {
                col_ind.push(per_row - 1 - k);
                values.push((i * per_row + k) as f64);
            }
            row_ptr.push(col_ind.len());
        }
        let csr = OwnedCsr {
            m,
            n: per_row,
            row_ptr,
            col_ind,
            values,
        };

        let sorted = sort_rows(csr);
        for i in 0..m {
            let row = &sorted.col_ind[i * per_row..(i + 1) * per_row];
            assert!(row.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(sorted.values[i * per_row], (i * per_row + per_row - 1) as f64);
        }
    }
}
