//! Error taxonomy shared by the normalizer and the execution engine
//!
//! Every check runs before any mutation, so an `Err` always means the
//! caller's vectors and matrix handle are exactly as they were.

use std::collections::TryReserveError;

use crate::matrix::scalar::ValueType;

/// Result type alias for sparse operations
pub type Result<T> = std::result::Result<T, SparseError>;

/// Errors returned by every public operation of the crate
#[derive(Debug, thiserror::Error)]
pub enum SparseError {
    /// A required array or vector was not supplied
    #[error("invalid pointer: `{0}` is null")]
    InvalidPointer(&'static str),

    /// A dimension is negative or an array is shorter than its declared size
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// An enum or index is out of range (index base, column index, row pointer)
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The matrix holds a different precision than the caller asked for
    #[error("wrong value type: matrix holds {found:?}, requested {expected:?}")]
    WrongType {
        /// Precision requested by the caller
        expected: ValueType,
        /// Precision stored in the matrix
        found: ValueType,
    },

    /// A supported-in-principle combination the engine does not run
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Allocation of normalized storage failed
    #[error("memory allocation failed: {0}")]
    MemoryError(#[from] TryReserveError),

    /// An internal post-condition was violated
    #[error("internal error: {0}")]
    Internal(String),
}
