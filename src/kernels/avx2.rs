//! AVX2/FMA row reductions for x86_64
//!
//! Hand-written versions of the narrow lane kernel: 4 x `f64` and
//! 8 x `f32` per 256-bit register. Callers obtain them through
//! [`crate::Scalar::native_row_dot`], which only hands them out after
//! [`is_available`] succeeds; the wrappers check it again before entering
//! `#[target_feature]` code.

#![cfg(target_arch = "x86_64")]

use std::arch::x86_64::*;

/// Check if AVX2 and FMA are available at runtime
pub fn is_available() -> bool {
    #[cfg(all(target_feature = "avx2", target_feature = "fma"))]
    {
        true
    }
    #[cfg(not(all(target_feature = "avx2", target_feature = "fma")))]
    {
        is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
    }
}

/// Row reduction over 4 x `f64` lanes
///
/// # Panics
///
/// Panics if the CPU lacks AVX2 or FMA.
pub(crate) fn row_dot_f64x4(vals: &[f64], cols: &[usize], x: &[f64], base: usize) -> f64 {
    assert!(is_available(), "AVX2+FMA kernel called on an unsupported CPU");
    debug_assert_eq!(vals.len(), cols.len());
    // SAFETY: the required target features were checked above. Vector loads
    // stay inside `vals`; `cols` and `x` are indexed with bounds checks.
    unsafe { row_dot_f64x4_avx2(vals, cols, x, base) }
}

/// Row reduction over 8 x `f32` lanes
///
/// # Panics
///
/// Panics if the CPU lacks AVX2 or FMA.
pub(crate) fn row_dot_f32x8(vals: &[f32], cols: &[usize], x: &[f32], base: usize) -> f32 {
    assert!(is_available(), "AVX2+FMA kernel called on an unsupported CPU");
    debug_assert_eq!(vals.len(), cols.len());
    // SAFETY: as for `row_dot_f64x4`.
    unsafe { row_dot_f32x8_avx2(vals, cols, x, base) }
}

#[target_feature(enable = "avx2,fma")]
unsafe fn row_dot_f64x4_avx2(vals: &[f64], cols: &[usize], x: &[f64], base: usize) -> f64 {
    let len = vals.len();
    let chunks = len / 4;

    let mut acc = _mm256_setzero_pd();
    for chunk in 0..chunks {
        let j = chunk * 4;
        // `j + 3 < len` for every full chunk
        let v = _mm256_loadu_pd(vals.as_ptr().add(j));
        let xv = _mm256_set_pd(
            x[cols[j + 3] - base],
            x[cols[j + 2] - base],
            x[cols[j + 1] - base],
            x[cols[j] - base],
        );
        acc = _mm256_fmadd_pd(v, xv, acc);
    }

    // (a0 + a2, a1 + a3), then the two halves
    let hi = _mm256_extractf128_pd(acc, 1);
    let lo = _mm256_castpd256_pd128(acc);
    let pair = _mm_add_pd(lo, hi);
    let upper = _mm_unpackhi_pd(pair, pair);
    let mut sum = _mm_cvtsd_f64(_mm_add_sd(pair, upper));

    for j in chunks * 4..len {
        sum += vals[j] * x[cols[j] - base];
    }
    sum
}

#[target_feature(enable = "avx2,fma")]
unsafe fn row_dot_f32x8_avx2(vals: &[f32], cols: &[usize], x: &[f32], base: usize) -> f32 {
    let len = vals.len();
    let chunks = len / 8;

    let mut acc = _mm256_setzero_ps();
    for chunk in 0..chunks {
        let j = chunk * 8;
        let v = _mm256_loadu_ps(vals.as_ptr().add(j));
        let xv = _mm256_set_ps(
            x[cols[j + 7] - base],
            x[cols[j + 6] - base],
            x[cols[j + 5] - base],
            x[cols[j + 4] - base],
            x[cols[j + 3] - base],
            x[cols[j + 2] - base],
            x[cols[j + 1] - base],
            x[cols[j] - base],
        );
        acc = _mm256_fmadd_ps(v, xv, acc);
    }

    // 8 -> 4 -> 2 -> 1 lanes
    let hi_quad = _mm256_extractf128_ps(acc, 1);
    let lo_quad = _mm256_castps256_ps128(acc);
    let sum_quad = _mm_add_ps(lo_quad, hi_quad);
    let hi_dual = _mm_movehl_ps(sum_quad, sum_quad);
    let sum_dual = _mm_add_ps(sum_quad, hi_dual);
    let hi = _mm_shuffle_ps(sum_dual, sum_dual, 0x1);
    let mut sum = _mm_cvtss_f32(_mm_add_ss(sum_dual, hi));

    for j in chunks * 8..len {
        sum += vals[j] * x[cols[j] - base];
    }
    sum
}
