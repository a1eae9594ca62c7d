//! Execution context and hardware detection
//!
//! Kernels never consult global state. Every entry point takes an
//! [`ExecContext`]; [`global_context`] exists only for callers that want a
//! process-wide default built once from the environment.

use std::sync::{Arc, OnceLock};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::constants::ENV_NUM_THREADS;
use crate::error::{Result, SparseError};

/// The target architecture for performance optimization
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Architecture {
    /// Intel/AMD x86_64 with AVX-512 support
    X86WithAVX512,
    /// Intel/AMD x86_64 without AVX-512 support
    X86WithoutAVX512,
    /// ARM architecture with NEON support (e.g., Apple Silicon)
    ArmNeon,
    /// Generic implementation for any architecture
    Generic,
}

impl Architecture {
    /// Whether 512-bit vectors are available
    pub fn has_wide_simd(&self) -> bool {
        matches!(self, Architecture::X86WithAVX512)
    }
}

/// Detects the current CPU architecture
pub fn detect_architecture() -> Architecture {
    #[cfg(target_arch = "aarch64")]
    {
        return Architecture::ArmNeon;
    }

    #[cfg(target_arch = "x86_64")]
    {
        #[cfg(target_feature = "avx512f")]
        {
            return Architecture::X86WithAVX512;
        }
        #[cfg(not(target_feature = "avx512f"))]
        {
            if std::is_x86_feature_detected!("avx512f") {
                return Architecture::X86WithAVX512;
            } else {
                return Architecture::X86WithoutAVX512;
            }
        }
    }

    // Fallback for other architectures
    #[allow(unreachable_code)]
    Architecture::Generic
}

/// Threads and vector capability for one or more products
///
/// Immutable once built. Cloning shares the worker pool.
#[derive(Clone)]
pub struct ExecContext {
    num_threads: usize,
    wide_simd: bool,
    pool: Option<Arc<ThreadPool>>,
}

impl ExecContext {
    /// Creates a context; a dedicated worker pool is built when
    /// `num_threads > 1`
    pub fn new(num_threads: usize, wide_simd: bool) -> Result<Self> {
        let num_threads = num_threads.max(1);
        let pool = if num_threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .thread_name(|i| format!("csrmv-worker-{}", i))
                .build()
                .map_err(|e| SparseError::Internal(format!("thread pool: {}", e)))?;
            Some(Arc::new(pool))
        } else {
            None
        };

        tracing::debug!(num_threads, wide_simd, "execution context created");

        Ok(Self {
            num_threads,
            wide_simd,
            pool,
        })
    }

    /// Single-threaded context without wide vectors
    pub fn serial() -> Self {
        Self {
            num_threads: 1,
            wide_simd: false,
            pool: None,
        }
    }

    /// Reads the thread count from `CSRMV_NUM_THREADS` (all cores when unset)
    /// and the vector capability from the running CPU
    pub fn from_env() -> Result<Self> {
        let num_threads = match std::env::var(ENV_NUM_THREADS) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(%value, "ignoring unusable {}", ENV_NUM_THREADS);
                    num_cpus::get()
                }
            },
            Err(_) => num_cpus::get(),
        };
        let arch = detect_architecture();
        tracing::debug!(?arch, "detected architecture");
        Self::new(num_threads, arch.has_wide_simd())
    }

    /// Number of worker threads
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Whether the widest vector kernels may be used
    pub fn wide_simd(&self) -> bool {
        self.wide_simd
    }

    /// Runs `op` inside this context's worker pool
    pub fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl std::fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("num_threads", &self.num_threads)
            .field("wide_simd", &self.wide_simd)
            .finish()
    }
}

static GLOBAL_CONTEXT: OnceLock<ExecContext> = OnceLock::new();

/// Process-wide context, initialised from the environment on first use
///
/// Falls back to [`ExecContext::serial`] if the worker pool cannot be built.
pub fn global_context() -> &'static ExecContext {
    GLOBAL_CONTEXT.get_or_init(|| {
        ExecContext::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to a serial context");
            ExecContext::serial()
        })
    })
}
