//! # Row Partitioning for Parallel Execution
//!
//! Rows of a CSR matrix are independent for the general kernel, so the
//! output vector can be cut into disjoint slices and handed to rayon.
//! Blocks are balanced by nonzero count rather than row count, and there
//! are several blocks per thread so work stealing absorbs skewed rows.

use std::ops::Range;

use crate::constants::{BLOCKS_PER_THREAD, MIN_ROWS_PER_BLOCK};

/// Cuts rows into contiguous blocks of roughly equal nonzero count
///
/// `row_ptr` may carry any base; only differences are used. Every row
/// belongs to exactly one block and blocks are returned in row order.
pub fn partition_rows(row_ptr: &[usize], num_threads: usize) -> Vec<Range<usize>> {
    let m = row_ptr.len().saturating_sub(1);
    if m == 0 {
        return Vec::new();
    }

    let n_blocks = (num_threads.max(1) * BLOCKS_PER_THREAD).min(m.div_ceil(MIN_ROWS_PER_BLOCK));
    if n_blocks <= 1 {
        return vec![0..m];
    }

    let nnz = row_ptr[m] - row_ptr[0];
    let target = nnz.div_ceil(n_blocks).max(1);

    let mut blocks = Vec::with_capacity(n_blocks + 1);
    let mut start = 0;
    for i in 0..m {
        let rows = i + 1 - start;
        let weight = row_ptr[i + 1] - row_ptr[start];
        if weight >= target && rows >= MIN_ROWS_PER_BLOCK {
            blocks.push(start..i + 1);
            start = i + 1;
        }
    }
    if start < m {
        blocks.push(start..m);
    }

    blocks
}

/// Splits `y` into the disjoint slices covered by `blocks`
///
/// `blocks` must be contiguous and start at row 0, as produced by
/// [`partition_rows`].
pub fn split_blocks_mut<'s, T>(
    y: &'s mut [T],
    blocks: &[Range<usize>],
) -> Vec<(Range<usize>, &'s mut [T])> {
    let mut out = Vec::with_capacity(blocks.len());
    let mut rest = y;
    for block in blocks {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(block.len());
        out.push((block.clone(), head));
        rest = tail;
    }
    out
}

/// Splits paired entry arrays into per-row segments
///
/// `row_ptr` must be zero-based.
pub fn split_rows_mut<'s, A, B>(
    row_ptr: &[usize],
    a: &'s mut [A],
    b: &'s mut [B],
) -> Vec<(&'s mut [A], &'s mut [B])> {
    let mut out = Vec::with_capacity(row_ptr.len().saturating_sub(1));
    let (mut a_rest, mut b_rest) = (a, b);
    for w in row_ptr.windows(2) {
        let len = w[1] - w[0];
        let (a_head, a_tail) = std::mem::take(&mut a_rest).split_at_mut(len);
        let (b_head, b_tail) = std::mem::take(&mut b_rest).split_at_mut(len);
        out.push((a_head, b_head));
        a_rest = a_tail;
        b_rest = b_tail;
    }
    out
}
