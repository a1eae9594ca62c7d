//! Numeric element types supported by the engine
//!
//! The four precisions form a closed set. [`ValueType`] is the runtime tag
//! stored in a [`SparseMatrix`]; [`Scalar`] carries the per-precision
//! kernel choices and is the only place that maps a tag to a concrete type.

use std::fmt;
use std::ops::AddAssign;

use num_complex::{Complex32, Complex64};
use num_traits::Num;

use crate::kernels::{LaneWidth, RowDot};
use crate::matrix::csr::{CsrMatrix, SparseMatrix};

/// Runtime tag for the element type of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Single-precision real
    F32,
    /// Double-precision real
    F64,
    /// Single-precision complex
    C32,
    /// Double-precision complex
    C64,
}

/// An element type the kernels can run on
pub trait Scalar: Copy + Num + AddAssign + Send + Sync + fmt::Debug + 'static {
    /// Tag matching this type
    const VALUE_TYPE: ValueType;

    /// Lane width of the vectorized kernel, `None` if this precision only
    /// runs the scalar row walk
    fn lane_width(wide_simd: bool) -> Option<LaneWidth>;

    /// Hardware-specific row reduction for `width`, when the running CPU
    /// supports one
    fn native_row_dot(_width: LaneWidth) -> Option<RowDot<Self>> {
        None
    }

    /// Borrow the typed matrix out of a tagged one
    fn typed<'m, 'a>(matrix: &'m SparseMatrix<'a>) -> Option<&'m CsrMatrix<'a, Self>>;
}

impl Scalar for f32 {
    const VALUE_TYPE: ValueType = ValueType::F32;

    fn lane_width(_wide_simd: bool) -> Option<LaneWidth> {
        Some(LaneWidth::Eight)
    }

    fn native_row_dot(width: LaneWidth) -> Option<RowDot<Self>> {
        #[cfg(target_arch = "x86_64")]
        {
            if width == LaneWidth::Eight && crate::kernels::avx2::is_available() {
                return Some(crate::kernels::avx2::row_dot_f32x8);
            }
        }
        let _ = width;
        None
    }

    fn typed<'m, 'a>(matrix: &'m SparseMatrix<'a>) -> Option<&'m CsrMatrix<'a, Self>> {
        match matrix {
            SparseMatrix::F32(m) => Some(m),
            _ => None,
        }
    }
}

impl Scalar for f64 {
    const VALUE_TYPE: ValueType = ValueType::F64;

    fn lane_width(wide_simd: bool) -> Option<LaneWidth> {
        if wide_simd {
            Some(LaneWidth::Eight)
        } else {
            Some(LaneWidth::Four)
        }
    }

    fn native_row_dot(width: LaneWidth) -> Option<RowDot<Self>> {
        #[cfg(target_arch = "x86_64")]
        {
            if width == LaneWidth::Four && crate::kernels::avx2::is_available() {
                return Some(crate::kernels::avx2::row_dot_f64x4);
            }
        }
        let _ = width;
        None
    }

    fn typed<'m, 'a>(matrix: &'m SparseMatrix<'a>) -> Option<&'m CsrMatrix<'a, Self>> {
        match matrix {
            SparseMatrix::F64(m) => Some(m),
            _ => None,
        }
    }
}

// Complex precisions have no vector path and always walk rows.

impl Scalar for Complex32 {
    const VALUE_TYPE: ValueType = ValueType::C32;

    fn lane_width(_wide_simd: bool) -> Option<LaneWidth> {
        None
    }

    fn typed<'m, 'a>(matrix: &'m SparseMatrix<'a>) -> Option<&'m CsrMatrix<'a, Self>> {
        match matrix {
            SparseMatrix::C32(m) => Some(m),
            _ => None,
        }
    }
}

impl Scalar for Complex64 {
    const VALUE_TYPE: ValueType = ValueType::C64;

    fn lane_width(_wide_simd: bool) -> Option<LaneWidth> {
        None
    }

    fn typed<'m, 'a>(matrix: &'m SparseMatrix<'a>) -> Option<&'m CsrMatrix<'a, Self>> {
        match matrix {
            SparseMatrix::C64(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_width_by_precision() {
        assert_eq!(f64::lane_width(false), Some(LaneWidth::Four));
        assert_eq!(f64::lane_width(true), Some(LaneWidth::Eight));
        assert_eq!(f32::lane_width(false), Some(LaneWidth::Eight));
        assert_eq!(Complex32::lane_width(true), None);
        assert_eq!(Complex64::lane_width(true), None);
    }

    #[test]
    fn test_complex_has_no_native_kernel() {
        assert!(Complex64::native_row_dot(LaneWidth::Four).is_none());
        assert!(Complex32::native_row_dot(LaneWidth::Eight).is_none());
    }
}
