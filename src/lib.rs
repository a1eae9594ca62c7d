//! # csrmv: CSR Normalization and Sparse Matrix-Vector Products
//!
//! Computes `y = alpha * A * x + beta * y` for sparse matrices stored in
//! compressed sparse row (CSR) form, in single and double precision, real
//! and complex.
//!
//! ## Overview
//!
//! The library has two halves, used in sequence:
//!
//! 1. **Normalization**: a caller triplet is validated and brought into a
//!    canonical form (rows sorted by column, explicit diagonal, per-row
//!    split tables). Clean input is used in place; anything else is copied
//!    once. The result is cached on the matrix handle.
//!
//! 2. **Execution**: each product picks a kernel from the matrix shape,
//!    density and precision:
//!    - **Scalar rows**: short rows and all complex matrices
//!    - **Lanes**: dense real rows, 4 or 8 lanes wide, with AVX2 on x86_64
//!    - **Symmetric**: one stored triangle, mirrored while multiplying
//!
//!    Large products run in parallel on the [`ExecContext`]'s thread pool.
//!
//! ## Usage
//!
//! Product with a raw triplet:
//!
//! ```
//! use csrmv::{dcsrmv, ExecContext, MatDescr, Operation, RawCsr};
//!
//! let row_ptr = [0, 2, 3, 4, 7, 8];
//! let col_ind = [0, 3, 1, 2, 1, 3, 4, 4];
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//! let a = RawCsr::new(5, 5, &row_ptr, &col_ind, &values);
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let mut y = [0.0; 5];
//! let ctx = ExecContext::serial();
//!
//! dcsrmv(Operation::None, 1.0, &a, &MatDescr::general(), Some(&x), 0.0, Some(&mut y), &ctx)?;
//! assert_eq!(y, [9.0, 6.0, 4.0, 59.0, 40.0]);
//! # Ok::<(), csrmv::SparseError>(())
//! ```
//!
//! Repeated products through an optimized handle:
//!
//! ```
//! use csrmv::{mv, CsrMatrix, ExecContext, IndexBase, MatDescr, Operation, RawCsr, SparseMatrix};
//!
//! let row_ptr = [0, 1, 3];
//! let col_ind = [1, 1, 0];
//! let values = [2.0, 3.0, 4.0];
//! let mut a: SparseMatrix = CsrMatrix::new(
//!     IndexBase::Zero,
//!     RawCsr::new(2, 2, &row_ptr, &col_ind, &values),
//! )
//! .into();
//! a.optimize()?;
//!
//! let mut y = [0.0; 2];
//! let ctx = ExecContext::serial();
//! mv(Operation::None, 1.0, &a, &MatDescr::general(), &[1.0, 1.0], 0.0, &mut y, &ctx)?;
//! assert_eq!(y, [2.0, 7.0]);
//! # Ok::<(), csrmv::SparseError>(())
//! ```

pub mod constants;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod normalize;
pub mod parallel;
pub mod spmv;
pub mod utils;

// Re-export primary components
pub use error::{Result, SparseError};
pub use kernels::{select_kernel, Kernel, LaneWidth};
pub use matrix::{
    detect_architecture, global_context, Architecture, AuxIndices, CsrMatrix, CsrRef,
    ExecContext, FillMode, IndexBase, MatDescr, MatrixType, Operation, OptimizedCsr, RawCsr,
    Scalar, SparseMatrix, ValueType,
};
pub use matrix::{dense_spmv, to_dense, to_dense_symmetric};
pub use normalize::{optimize, validate};
pub use spmv::{ccsrmv, csrmv, dcsrmv, mv, scsrmv, zcsrmv};
pub use utils::{raw_from_sprs, to_sprs};

/// Version information for the csrmv library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
