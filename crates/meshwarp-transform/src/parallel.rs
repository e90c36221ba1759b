use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride for AutoRows must be valid.
    #[error("row stride must be > 0 for AutoRows strategy")]
    InvalidRowStride(usize),

    /// Input and output batches do not have the same length.
    #[error("input and output batches must have the same length")]
    SizeMismatch,
}

/// Controls how the rows of a batch are partitioned across threads.
///
/// Every row is computed with the same arithmetic whatever the strategy, so the
/// strategy never changes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process every row in parallel.
    #[default]
    ParallelElements,

    /// Use the global Rayon thread pool to process chunks of `n` rows in parallel.
    ///
    /// Coarser chunks reduce scheduling overhead on very large batches.
    AutoRows(usize),

    /// Run sequentially on the current thread.
    ///
    /// Useful for small batches, debugging, or when the caller already runs
    /// on a worker thread.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Apply a function to every row of two input batches, writing one output row each.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `lhs` - The first input batch.
/// * `rhs` - The second input batch.
/// * `dst` - The output batch.
/// * `op` - The operation applied to each (lhs, rhs, dst) row triple.
///
/// # Errors
///
/// Returns [`ParallelError::SizeMismatch`] if the three batches differ in length, or
/// an error for an invalid strategy parameter.
pub fn execute_rows<A, B, T, F>(
    strategy: ExecutionStrategy,
    lhs: &[A],
    rhs: &[B],
    dst: &mut [T],
    op: F,
) -> Result<(), ParallelError>
where
    A: Sync,
    B: Sync,
    T: Send,
    F: Fn(&A, &B, &mut T) + Sync + Send,
{
    if lhs.len() != rhs.len() || lhs.len() != dst.len() {
        return Err(ParallelError::SizeMismatch);
    }

    match strategy {
        ExecutionStrategy::Serial => {
            lhs.iter()
                .zip(rhs.iter())
                .zip(dst.iter_mut())
                .for_each(|((a, b), out)| op(a, b, out));
        }
        ExecutionStrategy::ParallelElements => {
            lhs.par_iter()
                .zip(rhs.par_iter())
                .zip(dst.par_iter_mut())
                .for_each(|((a, b), out)| op(a, b, out));
        }
        ExecutionStrategy::AutoRows(stride) => {
            if stride == 0 {
                return Err(ParallelError::InvalidRowStride(stride));
            }
            lhs.par_chunks(stride)
                .zip(rhs.par_chunks(stride))
                .zip(dst.par_chunks_mut(stride))
                .for_each(|((lhs_rows, rhs_rows), dst_rows)| {
                    lhs_rows
                        .iter()
                        .zip(rhs_rows.iter())
                        .zip(dst_rows.iter_mut())
                        .for_each(|((a, b), out)| op(a, b, out));
                });
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                lhs.par_iter()
                    .zip(rhs.par_iter())
                    .zip(dst.par_iter_mut())
                    .for_each(|((a, b), out)| op(a, b, out));
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(strategy: ExecutionStrategy) -> Result<Vec<i32>, ParallelError> {
        let lhs = vec![1, 2, 3, 4, 5];
        let rhs = vec![10, 20, 30, 40, 50];
        let mut dst = vec![0; 5];
        execute_rows(strategy, &lhs, &rhs, &mut dst, |a, b, out| *out = a + b)?;
        Ok(dst)
    }

    #[test]
    fn test_execute_serial() -> Result<(), ParallelError> {
        assert_eq!(run(ExecutionStrategy::Serial)?, vec![11, 22, 33, 44, 55]);
        Ok(())
    }

    #[test]
    fn test_execute_parallel_elements() -> Result<(), ParallelError> {
        assert_eq!(
            run(ExecutionStrategy::ParallelElements)?,
            vec![11, 22, 33, 44, 55]
        );
        Ok(())
    }

    #[test]
    fn test_execute_auto_rows() -> Result<(), ParallelError> {
        // the last chunk is shorter than the stride
        assert_eq!(run(ExecutionStrategy::AutoRows(2))?, vec![11, 22, 33, 44, 55]);
        Ok(())
    }

    #[test]
    fn test_execute_auto_rows_invalid() {
        let res = run(ExecutionStrategy::AutoRows(0));
        assert!(matches!(res, Err(ParallelError::InvalidRowStride(0))));
    }

    #[test]
    fn test_execute_fixed_success() -> Result<(), ParallelError> {
        assert_eq!(run(ExecutionStrategy::Fixed(2))?, vec![11, 22, 33, 44, 55]);
        Ok(())
    }

    #[test]
    fn test_execute_fixed_invalid() {
        let res = run(ExecutionStrategy::Fixed(0));
        assert!(matches!(res, Err(ParallelError::InvalidThreadCount(0))));
    }

    #[test]
    fn test_execute_size_mismatch() {
        let mut dst = vec![0; 2];
        let res = execute_rows(
            ExecutionStrategy::Serial,
            &[1, 2],
            &[1, 2, 3],
            &mut dst,
            |a: &i32, b: &i32, out: &mut i32| *out = a + b,
        );
        assert_eq!(res, Err(ParallelError::SizeMismatch));
    }
}
