//! Error type for the execution fabric.

use thiserror::Error;

/// Failures raised by the execution fabric.
///
/// Group-width and scratch violations are configuration-class failures
/// surfaced by the capability checks before any dispatch; allocation and
/// scatter failures abort the run that hit them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// A dispatch asked for more lanes per work-group than the device has.
    #[error("work-group width {requested} exceeds the device maximum of {max} lanes")]
    GroupTooWide { requested: usize, max: usize },

    /// A stage declared more per-group local scratch than the device budget.
    #[error("local scratch of {required} bytes exceeds the {budget}-byte device budget")]
    ScratchExceeded { required: usize, budget: usize },

    /// A host-visible buffer could not be allocated.
    #[error("failed to allocate a {bytes}-byte buffer")]
    AllocationFailed { bytes: usize },

    /// A scatter destination fell outside the output buffer.
    #[error("scatter index {index} is out of bounds for a buffer of {len} elements")]
    ScatterOutOfBounds { index: usize, len: usize },

    /// The worker pool backing the lanes could not be built.
    #[error("failed to build the lane pool: {0}")]
    PoolBuild(String),
}
