//! Scalar row-walk kernel
//!
//! One multiply-add per stored entry. Used for sparse rows, where vector
//! setup costs more than it saves, and for every complex precision.

use crate::matrix::scalar::Scalar;

/// Sum of `vals[k] * x[cols[k] - base]` over one row
#[inline]
pub fn row_dot_scalar<T: Scalar>(vals: &[T], cols: &[usize], x: &[T], base: usize) -> T {
    let mut sum = T::zero();
    for (&v, &c) in vals.iter().zip(cols) {
        sum += v * x[c - base];
    }
    sum
}
