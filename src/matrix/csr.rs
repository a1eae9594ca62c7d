//! Compressed Sparse Row (CSR) matrix storage
//!
//! A CSR matrix moves through three shapes:
//!
//! - [`RawCsr`]: the caller's triplet exactly as supplied, with signed
//!   dimensions and possibly missing arrays. Nothing about it is trusted.
//! - [`CsrRef`]: a validated, borrowed view. Dimensions are non-negative,
//!   every array has its declared length and every stored index is in range.
//! - [`OptimizedCsr`]: rows sorted by column with an explicit diagonal,
//!   plus [`AuxIndices`]. It either borrows the caller's arrays (when they
//!   were already clean) or owns a normalized copy; the [`Cow`] makes that
//!   distinction part of the type.
//!
//! [`CsrMatrix`] is the handle tying a raw triplet to its cached optimized
//! form, and [`SparseMatrix`] tags a handle with its precision.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use num_complex::{Complex32, Complex64};

use crate::error::{Result, SparseError};
use crate::matrix::descriptor::IndexBase;
use crate::matrix::scalar::{Scalar, ValueType};
use crate::normalize;

/// The caller's CSR triplet
///
/// Arrays are optional so a missing input is reported as
/// [`SparseError::InvalidPointer`] rather than being unrepresentable.
#[derive(Debug, Clone, Copy)]
pub struct RawCsr<'a, T> {
    /// Number of rows
    pub m: isize,
    /// Number of columns
    pub n: isize,
    /// Number of stored entries
    pub nnz: isize,
    /// Row boundaries (length `m + 1`)
    pub row_ptr: Option<&'a [usize]>,
    /// Column index of each entry (length `nnz`)
    pub col_ind: Option<&'a [usize]>,
    /// Value of each entry (length `nnz`)
    pub values: Option<&'a [T]>,
}

impl<'a, T> RawCsr<'a, T> {
    /// Wraps fully populated arrays; `nnz` is taken from `values`
    pub fn new(
        m: usize,
        n: usize,
        row_ptr: &'a [usize],
        col_ind: &'a [usize],
        values: &'a [T],
    ) -> Self {
        Self {
            m: m as isize,
            n: n as isize,
            nnz: values.len() as isize,
            row_ptr: Some(row_ptr),
            col_ind: Some(col_ind),
            values: Some(values),
        }
    }
}

/// A validated CSR view
///
/// `row_ptr` holds `m + 1` entries and `col_ind`/`values` hold exactly
/// `nnz`. Stored indices are offset by `base`; [`CsrRef::row_range`] and
/// [`CsrRef::row_iter`] hand out zero-based positions and columns.
#[derive(Debug)]
pub struct CsrRef<'a, T> {
    /// Number of rows
    pub m: usize,
    /// Number of columns
    pub n: usize,
    /// Offset subtracted from every stored index
    pub base: usize,
    /// Row boundaries
    pub row_ptr: &'a [usize],
    /// Column indices
    pub col_ind: &'a [usize],
    /// Values
    pub values: &'a [T],
}

impl<T> Clone for CsrRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CsrRef<'_, T> {}

impl<'a, T> CsrRef<'a, T> {
    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Positions of row `i` within `col_ind`/`values`
    #[inline]
    pub fn row_range(&self, i: usize) -> Range<usize> {
        (self.row_ptr[i] - self.base)..(self.row_ptr[i + 1] - self.base)
    }

    /// Iterates row `i` as zero-based `(column, value)` pairs
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        let range = self.row_range(i);
        let base = self.base;
        let (cols, vals) = (self.col_ind, self.values);
        cols[range.clone()]
            .iter()
            .zip(&vals[range])
            .map(move |(&col, val)| (col - base, val))
    }
}

/// Per-row offsets splitting a sorted row into lower, diagonal and upper parts
///
/// Positions are absolute, zero-based indices into the column array.
/// `diag_position[i]` is the first entry of row `i` with column `>= i` and
/// `upper_start[i]` the first with column `> i`, so row `i` has a diagonal
/// entry exactly when `diag_position[i] < upper_start[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuxIndices {
    /// First entry at or right of the diagonal, per row
    pub diag_position: Vec<usize>,
    /// First strictly-upper entry, per row
    pub upper_start: Vec<usize>,
}

impl AuxIndices {
    /// Entries strictly left of the diagonal in row `i`
    #[inline]
    pub fn lower(&self, row: Range<usize>, i: usize) -> Range<usize> {
        row.start..self.diag_position[i]
    }

    /// Diagonal entries of row `i` (empty or a single position)
    #[inline]
    pub fn diagonal(&self, i: usize) -> Range<usize> {
        self.diag_position[i]..self.upper_start[i]
    }

    /// Entries strictly right of the diagonal in row `i`
    #[inline]
    pub fn upper(&self, row: Range<usize>, i: usize) -> Range<usize> {
        self.upper_start[i]..row.end
    }
}

/// Canonical storage consumed by the kernels
///
/// Rows are sorted by column and every row `i < n` carries a diagonal entry.
pub struct OptimizedCsr<'a, T: Clone> {
    pub(crate) m: usize,
    pub(crate) n: usize,
    pub(crate) base: usize,
    pub(crate) row_ptr: Cow<'a, [usize]>,
    pub(crate) col_ind: Cow<'a, [usize]>,
    pub(crate) values: Cow<'a, [T]>,
    pub(crate) aux: AuxIndices,
    pub(crate) user_full_diag: bool,
    pub(crate) inserted_diagonals: usize,
}

impl<'a, T: Clone> OptimizedCsr<'a, T> {
    /// Borrowed view of the normalized arrays
    pub fn view(&self) -> CsrRef<'_, T> {
        CsrRef {
            m: self.m,
            n: self.n,
            base: self.base,
            row_ptr: &self.row_ptr,
            col_ind: &self.col_ind,
            values: &self.values,
        }
    }

    /// Row split tables
    pub fn aux(&self) -> &AuxIndices {
        &self.aux
    }

    /// Whether the arrays are a private copy rather than the caller's memory
    pub fn owns_storage(&self) -> bool {
        matches!(self.values, Cow::Owned(_))
    }

    /// Index base of the stored arrays
    ///
    /// Copies are always zero-based; aliased storage keeps the caller's base.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Number of stored entries, including inserted diagonal zeros
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Whether the caller's matrix already held every diagonal entry
    pub fn user_full_diag(&self) -> bool {
        self.user_full_diag
    }

    /// Number of zero diagonal entries added during normalization
    pub fn inserted_diagonals(&self) -> usize {
        self.inserted_diagonals
    }

    /// Row pointers
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column indices
    pub fn col_ind(&self) -> &[usize] {
        &self.col_ind
    }

    /// Values
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// Matrix handle: a raw triplet plus its memoized optimized form
pub struct CsrMatrix<'a, T: Clone> {
    base: IndexBase,
    raw: RawCsr<'a, T>,
    optimized: Option<OptimizedCsr<'a, T>>,
}

impl<'a, T: Scalar> CsrMatrix<'a, T> {
    /// Creates a handle over the caller's arrays
    ///
    /// Nothing is checked until [`CsrMatrix::optimize`] or a product runs.
    pub fn new(base: IndexBase, raw: RawCsr<'a, T>) -> Self {
        Self {
            base,
            raw,
            optimized: None,
        }
    }

    /// Index base of the caller's arrays
    pub fn base(&self) -> IndexBase {
        self.base
    }

    /// The caller's triplet
    pub fn raw(&self) -> &RawCsr<'a, T> {
        &self.raw
    }

    /// Whether [`CsrMatrix::optimize`] has completed
    pub fn is_optimized(&self) -> bool {
        self.optimized.is_some()
    }

    /// The optimized form, if built
    pub fn optimized(&self) -> Option<&OptimizedCsr<'a, T>> {
        self.optimized.as_ref()
    }

    /// Whether the optimized form owns a private copy
    pub fn owns_storage(&self) -> bool {
        self.optimized
            .as_ref()
            .map_or(false, OptimizedCsr::owns_storage)
    }

    /// Validated view of the caller's arrays
    pub fn validated(&self) -> Result<CsrRef<'a, T>> {
        normalize::validate(&self.raw, self.base)
    }

    /// Builds and caches the optimized form; a no-op once built
    pub fn optimize(&mut self) -> Result<()> {
        if self.optimized.is_some() {
            tracing::trace!("matrix already optimized");
            return Ok(());
        }
        let optimized = normalize::optimize(&self.raw, self.base)?;
        self.optimized = Some(optimized);
        Ok(())
    }
}

impl<T: Scalar> fmt::Debug for CsrMatrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CsrMatrix<{:?}> {{", T::VALUE_TYPE)?;
        writeln!(f, "  dimensions: {} × {}", self.raw.m, self.raw.n)?;
        writeln!(f, "  nnz: {}", self.raw.nnz)?;
        writeln!(f, "  base: {:?}", self.base)?;

        match &self.optimized {
            None => writeln!(f, "  optimized: no")?,
            Some(opt) => {
                writeln!(
                    f,
                    "  optimized: yes ({}, {} diagonal entries inserted)",
                    if opt.owns_storage() { "owned" } else { "aliased" },
                    opt.inserted_diagonals
                )?;
                write_rows(f, &opt.view())?;
            }
        }

        write!(f, "}}")
    }
}

/// Prints a sample of the matrix content
fn write_rows<T: fmt::Debug>(f: &mut fmt::Formatter<'_>, csr: &CsrRef<'_, T>) -> fmt::Result {
    let max_rows_to_print = 5.min(csr.m);

    if max_rows_to_print > 0 {
        writeln!(f, "  content sample:")?;

        for i in 0..max_rows_to_print {
            write!(f, "    row {}: ", i)?;
            let range = csr.row_range(i);

            if range.is_empty() {
                writeln!(f, "(empty)")?;
            } else {
                let max_elements = 5.min(range.len());

                for (col, val) in csr.row_iter(i).take(max_elements) {
                    write!(f, "({}, {:?}) ", col, val)?;
                }

                if range.len() > max_elements {
                    write!(f, "... ({} more)", range.len() - max_elements)?;
                }

                writeln!(f)?;
            }
        }

        if csr.m > max_rows_to_print {
            writeln!(f, "    ... ({} more rows)", csr.m - max_rows_to_print)?;
        }
    }

    Ok(())
}

/// A matrix handle tagged with its precision
#[derive(Debug)]
pub enum SparseMatrix<'a> {
    /// Single-precision real
    F32(CsrMatrix<'a, f32>),
    /// Double-precision real
    F64(CsrMatrix<'a, f64>),
    /// Single-precision complex
    C32(CsrMatrix<'a, Complex32>),
    /// Double-precision complex
    C64(CsrMatrix<'a, Complex64>),
}

impl<'a> SparseMatrix<'a> {
    /// Precision tag
    pub fn value_type(&self) -> ValueType {
        match self {
            SparseMatrix::F32(_) => ValueType::F32,
            SparseMatrix::F64(_) => ValueType::F64,
            SparseMatrix::C32(_) => ValueType::C32,
            SparseMatrix::C64(_) => ValueType::C64,
        }
    }

    /// Index base of the underlying arrays
    pub fn base(&self) -> IndexBase {
        match self {
            SparseMatrix::F32(m) => m.base(),
            SparseMatrix::F64(m) => m.base(),
            SparseMatrix::C32(m) => m.base(),
            SparseMatrix::C64(m) => m.base(),
        }
    }

    /// Whether the optimized form has been built
    pub fn is_optimized(&self) -> bool {
        match self {
            SparseMatrix::F32(m) => m.is_optimized(),
            SparseMatrix::F64(m) => m.is_optimized(),
            SparseMatrix::C32(m) => m.is_optimized(),
            SparseMatrix::C64(m) => m.is_optimized(),
        }
    }

    /// Builds and caches the optimized form for whichever precision is held
    pub fn optimize(&mut self) -> Result<()> {
        match self {
            SparseMatrix::F32(m) => m.optimize(),
            SparseMatrix::F64(m) => m.optimize(),
            SparseMatrix::C32(m) => m.optimize(),
            SparseMatrix::C64(m) => m.optimize(),
        }
    }

    /// Borrows the typed handle, failing if the precision differs from `T`
    pub fn typed<T: Scalar>(&self) -> Result<&CsrMatrix<'a, T>> {
        let found = self.value_type();
        T::typed(self).ok_or(SparseError::WrongType {
            expected: T::VALUE_TYPE,
            found,
        })
    }
}

impl<'a> From<CsrMatrix<'a, f32>> for SparseMatrix<'a> {
    fn from(m: CsrMatrix<'a, f32>) -> Self {
        SparseMatrix::F32(m)
    }
}

impl<'a> From<CsrMatrix<'a, f64>> for SparseMatrix<'a> {
    fn from(m: CsrMatrix<'a, f64>) -> Self {
        SparseMatrix::F64(m)
    }
}

impl<'a> From<CsrMatrix<'a, Complex32>> for SparseMatrix<'a> {
    fn from(m: CsrMatrix<'a, Complex32>) -> Self {
        SparseMatrix::C32(m)
    }
}

impl<'a> From<CsrMatrix<'a, Complex64>> for SparseMatrix<'a> {
    fn from(m: CsrMatrix<'a, Complex64>) -> Self {
        SparseMatrix::C64(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_iter_one_based() {
        let row_ptr = [1, 3, 4];
        let col_ind = [2, 1, 2];
        let values = [1.0, 2.0, 3.0];
        let csr = CsrRef {
            m: 2,
            n: 2,
            base: 1,
            row_ptr: &row_ptr,
            col_ind: &col_ind,
            values: &values,
        };

        assert_eq!(csr.nnz(), 3);
        assert_eq!(csr.row_range(0), 0..2);
        let row0: Vec<_> = csr.row_iter(0).collect();
        assert_eq!(row0, vec![(1, &1.0), (0, &2.0)]);
        let row1: Vec<_> = csr.row_iter(1).collect();
        assert_eq!(row1, vec![(1, &3.0)]);
    }

    #[test]
    fn test_aux_segments() {
        let aux = AuxIndices {
            diag_position: vec![1],
            upper_start: vec![2],
        };
        assert_eq!(aux.lower(0..4, 0), 0..1);
        assert_eq!(aux.diagonal(0), 1..2);
        assert_eq!(aux.upper(0..4, 0), 2..4);
    }

    #[test]
    fn test_typed_wrong_type() {
        let row_ptr = [0, 1];
        let col_ind = [0];
        let values = [1.0f32];
        let matrix: SparseMatrix =
            CsrMatrix::new(IndexBase::Zero, RawCsr::new(1, 1, &row_ptr, &col_ind, &values)).into();

        assert_eq!(matrix.value_type(), ValueType::F32);
        assert!(matrix.typed::<f32>().is_ok());
        match matrix.typed::<f64>() {
            Err(SparseError::WrongType { expected, found }) => {
                assert_eq!(expected, ValueType::F64);
                assert_eq!(found, ValueType::F32);
            }
            other => panic!("expected WrongType, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_debug_output() {
        let row_ptr = [0, 2, 3];
        let col_ind = [0, 1, 1];
        let values = [1.0, 2.0, 3.0];
        let mut matrix =
            CsrMatrix::new(IndexBase::Zero, RawCsr::new(2, 2, &row_ptr, &col_ind, &values));
        assert!(format!("{:?}", matrix).contains("optimized: no"));

        matrix.optimize().unwrap();
        let text = format!("{:?}", matrix);
        assert!(text.contains("aliased"));
        assert!(text.contains("row 0: (0, 1.0) (1, 2.0)"));
    }
}
