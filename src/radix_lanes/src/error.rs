//! Error taxonomy of the sort pipeline.

use lane_exec::ExecError;
use thiserror::Error;

/// Failures that abort a sort.
///
/// Count and capability problems are caught at configuration time, before
/// any buffer is allocated or dispatch submitted. Allocation and dispatch
/// failures abort the run with no partial result; a half-permuted array is
/// meaningless, so nothing is retried or salvaged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// The element count cannot be tiled into whole scan tiles.
    #[error("element count {count} must be a power-of-two multiple of {tile}")]
    CountNotTileable { count: usize, tile: usize },

    /// The element count exceeds the scratch-budget cap.
    #[error("element count {count} exceeds the {max}-element cap")]
    CountExceedsCap { count: usize, max: usize },

    /// The input slice does not match the configured element count.
    #[error("input length {got} does not match the configured {expected} elements")]
    LengthMismatch { got: usize, expected: usize },

    /// The modeled device cannot host the pipeline's work-groups.
    #[error("device capability check failed")]
    Capability(#[source] ExecError),

    /// The execution pool could not be brought up.
    #[error("lane pool unavailable")]
    PoolUnavailable(#[source] ExecError),

    /// A shared buffer could not be allocated.
    #[error("buffer allocation failed")]
    Allocation(#[source] ExecError),

    /// A dispatch failed mid-pipeline and the run was abandoned.
    #[error("{stage} dispatch failed on pass {pass}")]
    PassFailed {
        pass: u32,
        stage: &'static str,
        #[source]
        source: ExecError,
    },
}
