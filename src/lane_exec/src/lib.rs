//! Software work-group execution fabric for lane-parallel pipelines.
//!
//! This crate models the execution environment a GPU-style sort pipeline
//! expects, on top of a thread pool:
//! - capability limits of the modeled device ([`DeviceLimits`])
//! - fallible host-visible buffer allocation ([`alloc_zeroed`], [`Table2d`],
//!   [`DoubleBuffer`])
//! - bounds-checked concurrent scatter ([`ScatterWriter`])
//! - blocking data-parallel dispatch ([`LanePool`])
//!
//! Stages built on this fabric coordinate only through dispatch boundaries:
//! a [`LanePool::submit`] call returns when the whole batch has completed,
//! so each stage's writes are visible before the next stage reads them.
//!
//! # Example
//!
//! ```ignore
//! use lane_exec::{LanePool, Table2d};
//!
//! let pool = LanePool::new()?;
//! let mut table = Table2d::<u32>::zeroed(64, 256)?;
//! pool.submit(|| {
//!     // data-parallel work over disjoint rows of `table`
//! });
//! ```

pub mod buffer;
pub mod error;
pub mod limits;
pub mod pool;

pub use buffer::{alloc_zeroed, DoubleBuffer, ScatterWriter, Table2d};
pub use error::ExecError;
pub use limits::DeviceLimits;
pub use pool::LanePool;
