//! Portable W-lane row reduction
//!
//! Entries are consumed in chunks of `W`: values are loaded contiguously,
//! the matching `x` entries are gathered through the column indices, and a
//! `W`-wide accumulator is updated lane by lane. The fixed-size array lets
//! the compiler keep the accumulator in vector registers.

use crate::matrix::scalar::Scalar;

/// Sum of `vals[k] * x[cols[k] - base]` over one row, `W` lanes at a time
#[inline]
pub fn row_dot_lanes<T: Scalar, const W: usize>(
    vals: &[T],
    cols: &[usize],
    x: &[T],
    base: usize,
) -> T {
    let mut acc = [T::zero(); W];

    let mut val_chunks = vals.chunks_exact(W);
    let mut col_chunks = cols.chunks_exact(W);
    for (v, c) in (&mut val_chunks).zip(&mut col_chunks) {
        let mut gathered = [T::zero(); W];
        for lane in 0..W {
            gathered[lane] = x[c[lane] - base];
        }
        for lane in 0..W {
            acc[lane] += v[lane] * gathered[lane];
        }
    }

    let mut sum = horizontal_sum(acc);

    for (&v, &c) in val_chunks.remainder().iter().zip(col_chunks.remainder()) {
        sum += v * x[c - base];
    }

    sum
}

/// Pairwise tree reduction of a `W`-lane accumulator
///
/// Halves the live width each step, adding the upper half onto the lower.
#[inline]
pub fn horizontal_sum<T: Scalar, const W: usize>(mut acc: [T; W]) -> T {
    let mut width = W;
    while width > 1 {
        let half = width / 2;
        for lane in 0..half {
            let upper = acc[lane + half];
            acc[lane] += upper;
        }
        width = half;
    }
    acc[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_sum() {
        assert_eq!(horizontal_sum([1.0, 2.0, 3.0, 4.0]), 10.0);
        assert_eq!(horizontal_sum([1.0f32; 8]), 8.0);
        assert_eq!(horizontal_sum([5.0]), 5.0);
    }

    #[test]
    fn test_row_dot_with_remainder() {
        // 6 entries: one full 4-chunk and a remainder of 2
        let vals = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let cols = [5, 4, 3, 2, 1, 0];
        let x = [1.0, 10.0, 100.0, 1000.0, 10000.0, 100000.0];
        let expected = 100000.0 + 20000.0 + 3000.0 + 400.0 + 50.0 + 6.0;

        assert_eq!(row_dot_lanes::<f64, 4>(&vals, &cols, &x, 0), expected);
        assert_eq!(row_dot_lanes::<f64, 8>(&vals, &cols, &x, 0), expected);
    }

    #[test]
    fn test_row_dot_one_based() {
        let vals = [2.0f32, 3.0];
        let cols = [1, 2];
        let x = [10.0, 100.0];
        assert_eq!(row_dot_lanes::<f32, 8>(&vals, &cols, &x, 1), 320.0);
    }
}
