//! Centralized constants for the csrmv library
//!
//! All tuning knobs used by the normalizer and the kernel dispatcher live
//! here rather than scattered throughout the code.

// ============================================================================
// DISPATCH THRESHOLDS
// ============================================================================

/// Mean nonzeros per row at or below which the scalar row-walk kernel is used
///
/// Dispatch picks the scalar kernel when `nnz <= DENSITY_THRESHOLD * m`.
pub const DENSITY_THRESHOLD: usize = 10;

/// Lanes of [`LaneWidth::Four`](crate::LaneWidth::Four): `f64` in 256 bits
pub const NARROW_LANES: usize = 4;

/// Lanes of [`LaneWidth::Eight`](crate::LaneWidth::Eight): `f64` in 512 bits
/// or `f32` in 256 bits
pub const WIDE_LANES: usize = 8;

// ============================================================================
// PARALLEL EXECUTION
// ============================================================================

/// Row blocks handed out per worker thread
///
/// More blocks than threads lets rayon's work stealing rebalance rows
/// whose nonzero counts are skewed.
pub const BLOCKS_PER_THREAD: usize = 4;

/// Minimum rows in a partition block
pub const MIN_ROWS_PER_BLOCK: usize = 16;

/// Below this many nonzeros a product runs on the calling thread
pub const PARALLEL_MIN_NNZ: usize = 4096;

/// Below this many nonzeros row sorting runs serially
pub const PARALLEL_SORT_MIN_NNZ: usize = 1 << 14;

// ============================================================================
// MEMORY AND CACHE CONSTANTS
// ============================================================================

/// Alignment in bytes of per-thread scatter buffers
pub const CACHE_LINE_BYTES: usize = 64;

// ============================================================================
// ENVIRONMENT
// ============================================================================

/// Environment variable read by [`crate::ExecContext::from_env`]
pub const ENV_NUM_THREADS: &str = "CSRMV_NUM_THREADS";
