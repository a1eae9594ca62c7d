// Matrix data structures, descriptors and execution configuration

pub mod config;
pub mod csr;
pub mod descriptor;
pub mod reference;
pub mod scalar;

pub use config::{detect_architecture, global_context, Architecture, ExecContext};
pub use csr::{AuxIndices, CsrMatrix, CsrRef, OptimizedCsr, RawCsr, SparseMatrix};
pub use descriptor::{FillMode, IndexBase, MatDescr, MatrixType, Operation};
pub use reference::{dense_spmv, to_dense, to_dense_symmetric};
pub use scalar::{Scalar, ValueType};
