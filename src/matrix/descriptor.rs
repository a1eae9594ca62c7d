//! Matrix descriptors: operation, shape, fill mode and index base

use crate::error::{Result, SparseError};

/// Operation applied to the matrix before the product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    /// `y = alpha * A * x + beta * y`
    #[default]
    None,
    /// `y = alpha * A^T * x + beta * y`
    Transpose,
    /// `y = alpha * A^H * x + beta * y`
    ConjugateTranspose,
}

/// Structural type of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixType {
    /// No structure assumed
    #[default]
    General,
    /// Only one triangle is stored; the other is its mirror
    Symmetric,
    /// Only one triangle is stored; the other is its conjugate mirror
    Hermitian,
    /// Only one triangle is nonzero
    Triangular,
}

/// Which triangle of a symmetric matrix is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Entries with `col <= row`
    #[default]
    Lower,
    /// Entries with `col >= row`
    Upper,
}

/// Whether row and column indices start at 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// C-style indexing
    #[default]
    Zero,
    /// Fortran-style indexing
    One,
}

impl IndexBase {
    /// The numeric offset subtracted from every stored index
    pub fn offset(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

impl TryFrom<i32> for IndexBase {
    type Error = SparseError;

    fn try_from(base: i32) -> Result<Self> {
        match base {
            0 => Ok(IndexBase::Zero),
            1 => Ok(IndexBase::One),
            other => Err(SparseError::InvalidValue(format!(
                "index base must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

/// Read-only description of how a matrix should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatDescr {
    /// Structural type
    pub matrix_type: MatrixType,
    /// Stored triangle (symmetric matrices only)
    pub fill_mode: FillMode,
    /// Index base of the arrays
    pub base: IndexBase,
}

impl MatDescr {
    /// A zero-based general matrix descriptor
    pub fn general() -> Self {
        Self::default()
    }

    /// A zero-based symmetric matrix descriptor storing the given triangle
    pub fn symmetric(fill_mode: FillMode) -> Self {
        Self {
            matrix_type: MatrixType::Symmetric,
            fill_mode,
            base: IndexBase::Zero,
        }
    }

    /// Same descriptor with a different index base
    pub fn with_base(mut self, base: IndexBase) -> Self {
        self.base = base;
        self
    }
}
