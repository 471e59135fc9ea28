//! Pass orchestration: four digit windows, three stages each.
//!
//! # Architecture
//!
//! A [`RadixSorter`] owns the execution pool and every table the passes
//! share: the group-major counts, the digit-major offsets, the scan
//! scratch, and the double-buffered working array. Capability checks and
//! allocation all happen in [`RadixSorter::new`]; [`RadixSorter::sort`]
//! then runs the fixed dispatch sequence
//!
//! ```text
//! for shift in [0, 8, 16, 24]:
//!     count_digits    (1 dispatch)
//!     scan_offsets    (3 or 5 dispatches)
//!     scatter_pass    (1 dispatch)
//!     swap front/back
//! ```
//!
//! Every dispatch completes before the next is submitted; stages and passes
//! never overlap. A failed stage abandons the run, because a partially
//! permuted array carries no usable information.

use lane_exec::{DeviceLimits, DoubleBuffer, LanePool, Table2d};
use tracing::{debug, info};

use crate::config::SortConfig;
use crate::error::SortError;
use crate::scan::{self, ScanPlan, ScanScratch};
use crate::{histogram, permute, PASSES, RADICES, RADIX_BITS};

/// Lane-parallel stable radix sorter for `u32` keys.
///
/// Buffers are sized for one [`SortConfig`] at construction and reused
/// across calls to [`sort`](Self::sort).
pub struct RadixSorter {
    pool: LanePool,
    config: SortConfig,
    plan: ScanPlan,
    counts: Table2d<u32>,
    offsets: Table2d<u32>,
    scratch: ScanScratch,
    work: DoubleBuffer<u32>,
}

impl RadixSorter {
    /// Build a sorter for `config` on the default device tier.
    pub fn new(config: SortConfig) -> Result<Self, SortError> {
        Self::with_limits(config, DeviceLimits::default())
    }

    /// Build a sorter for `config`, validating it against explicit limits.
    ///
    /// Checks the capability preconditions first (widest work-group and both
    /// stages' scratch declarations), then allocates every shared buffer, so
    /// a configuration problem surfaces before any memory or dispatch.
    pub fn with_limits(config: SortConfig, limits: DeviceLimits) -> Result<Self, SortError> {
        limits.check_group_width(RADICES).map_err(SortError::Capability)?;
        limits
            .check_scratch(histogram::SCRATCH_BYTES)
            .map_err(SortError::Capability)?;
        limits
            .check_scratch(permute::SCRATCH_BYTES)
            .map_err(SortError::Capability)?;

        let pool = LanePool::with_limits(limits).map_err(SortError::PoolUnavailable)?;
        let plan = ScanPlan::for_groups(config.num_groups());
        let counts =
            Table2d::zeroed(config.num_groups(), RADICES).map_err(SortError::Allocation)?;
        let offsets =
            Table2d::zeroed(RADICES, config.num_groups()).map_err(SortError::Allocation)?;
        let scratch = ScanScratch::new(plan).map_err(SortError::Allocation)?;
        let work = DoubleBuffer::zeroed(config.element_count()).map_err(SortError::Allocation)?;

        info!(
            "radix sorter ready: {} elements, {} groups, {} tiles, {} workers",
            config.element_count(),
            config.num_groups(),
            plan.num_tiles(),
            pool.workers()
        );

        Ok(Self {
            pool,
            config,
            plan,
            counts,
            offsets,
            scratch,
            work,
        })
    }

    /// Geometry this sorter was built for.
    pub fn config(&self) -> SortConfig {
        self.config
    }

    /// Sort `input` ascending, leaving `input` untouched.
    ///
    /// Runs four least-significant-first digit passes, each a fixed
    /// count → scan → scatter dispatch sequence with a completion barrier
    /// between every dispatch. The front buffer holds the result after the
    /// final swap.
    ///
    /// # Errors
    /// [`SortError::LengthMismatch`] when `input` does not match the
    /// configured element count; [`SortError::PassFailed`] when a dispatch
    /// fails, in which case the run is abandoned with no partial result.
    pub fn sort(&mut self, input: &[u32]) -> Result<Vec<u32>, SortError> {
        if input.len() != self.config.element_count() {
            return Err(SortError::LengthMismatch {
                got: input.len(),
                expected: self.config.element_count(),
            });
        }

        self.work.load(input);

        for pass in 0..PASSES {
            let shift = pass * RADIX_BITS;
            debug!("pass {}: digit window at bit {}", pass, shift);

            let (front, back) = self.work.parts_mut();
            histogram::count_digits(&self.pool, shift, front, &mut self.counts);
            scan::scan_offsets(
                &self.pool,
                self.plan,
                &self.counts,
                &mut self.scratch,
                &mut self.offsets,
            );
            permute::scatter_pass(&self.pool, shift, front, &self.offsets, back).map_err(
                |source| SortError::PassFailed {
                    pass,
                    stage: "scatter",
                    source,
                },
            )?;

            self.work.swap();
        }

        debug!("sorted {} elements in {} passes", self.work.len(), PASSES);
        Ok(self.work.front().to_vec())
    }
}
