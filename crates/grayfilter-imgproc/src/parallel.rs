use rayon::prelude::*;
use thiserror::Error;

/// Minimum number of pixels for [`ExecutionStrategy::Auto`] to go parallel.
pub const AUTO_PARALLEL_MIN_PIXELS: usize = 65_536;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row length must be valid.
    #[error("row length must be > 0, got {0}")]
    InvalidRowLength(usize),
}

/// Controls how the rows of an output image are scheduled.
///
/// Every strategy produces the same output; only the scheduling differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool with one task per output row.
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool for every filter call, which has significant overhead.
    /// The passes of a single call share the pool, see [`with_strategy_pool`].
    Fixed(usize),

    /// Rows in parallel for images of at least [`AUTO_PARALLEL_MIN_PIXELS`] pixels,
    /// serial otherwise.
    #[default]
    Auto,
}

impl ExecutionStrategy {
    /// Whether the strategy runs in parallel for a workload of `num_pixels` pixels.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::ParallelRows | ExecutionStrategy::Fixed(_) => true,
            ExecutionStrategy::Auto => num_pixels >= AUTO_PARALLEL_MIN_PIXELS,
        }
    }
}

/// Run `op` once with the thread pool the strategy asks for.
///
/// For [`ExecutionStrategy::Fixed`] a local pool is built and `op` runs inside it with
/// [`ExecutionStrategy::ParallelRows`], so that several passes share one pool. The
/// other strategies are passed through unchanged.
///
/// # Errors
///
/// Returns an error if a [`ExecutionStrategy::Fixed`] pool cannot be built.
pub fn with_strategy_pool<R, F>(strategy: ExecutionStrategy, op: F) -> Result<R, ParallelError>
where
    R: Send,
    F: FnOnce(ExecutionStrategy) -> R + Send,
{
    match strategy {
        ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            Ok(pool.install(|| op(ExecutionStrategy::ParallelRows)))
        }
        _ => Ok(op(strategy)),
    }
}

/// Apply a function to every row of `dst` with the given strategy.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The destination buffer, a whole number of rows.
/// * `row_len` - The number of elements in a row.
/// * `op` - The operation to run with the row index and the mutable row.
///
/// # Errors
///
/// Returns an error if `row_len` is zero or if a [`ExecutionStrategy::Fixed`] pool
/// cannot be built.
pub fn par_iter_rows_mut<T, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    row_len: usize,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return Err(ParallelError::InvalidRowLength(row_len));
    }

    match strategy {
        ExecutionStrategy::Fixed(_) => {
            with_strategy_pool(strategy, |strategy| {
                par_iter_rows_mut(strategy, dst, row_len, op)
            })??;
        }
        _ if strategy.is_parallel(dst.len()) => {
            dst.par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| op(y, row));
        }
        _ => {
            dst.chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| op(y, row));
        }
    }

    Ok(())
}
