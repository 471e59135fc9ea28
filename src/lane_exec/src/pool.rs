//! Blocking dispatch pool, the software analog of an in-order compute queue.

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::ExecError;
use crate::limits::DeviceLimits;

/// Work-group execution pool.
///
/// Owns the worker threads that play the role of compute lanes, plus the
/// limits of the modeled device. [`submit`](LanePool::submit) runs one
/// data-parallel batch and returns only when every group in the batch has
/// finished, which is the completion barrier between pipeline stages.
#[derive(Debug)]
pub struct LanePool {
    limits: DeviceLimits,
    workers: ThreadPool,
}

impl LanePool {
    /// Create a pool for the default device tier.
    pub fn new() -> Result<Self, ExecError> {
        Self::with_limits(DeviceLimits::default())
    }

    /// Create a pool with explicit device limits.
    pub fn with_limits(limits: DeviceLimits) -> Result<Self, ExecError> {
        let workers = ThreadPoolBuilder::new()
            .build()
            .map_err(|e| ExecError::PoolBuild(e.to_string()))?;
        Ok(Self { limits, workers })
    }

    /// Limits of the modeled device.
    pub fn limits(&self) -> DeviceLimits {
        self.limits
    }

    /// Number of worker threads backing the lanes.
    pub fn workers(&self) -> usize {
        self.workers.current_num_threads()
    }

    /// Submit one data-parallel batch and block until it completes.
    ///
    /// Parallel iterators inside `batch` run on this pool's workers. By the
    /// time `submit` returns, every group of the batch has finished and its
    /// writes are visible to the next dispatch.
    pub fn submit<R: Send>(&self, batch: impl FnOnce() -> R + Send) -> R {
        self.workers.install(batch)
    }
}
