//! Scatter stage: move every element to its scanned destination.
//!
//! Each work-group walks its 256-element slice in index order, advancing a
//! private copy of its offset counters (the local-scratch analog: 64 lanes
//! × 256 `u16` counters per group is the full 32 KiB budget, which is what
//! caps the array size). The counter of a (group, digit) cell only grows,
//! so equal keys land in input order; together with the exclusive scan this
//! is the stability guarantee.
//!
//! Bucket ranges of distinct groups never overlap (by construction of the
//! offsets), so all groups scatter into one shared output concurrently. A
//! destination outside the output means the offsets are defective; the pass
//! fails rather than clamping or skipping the write.

use lane_exec::{ExecError, LanePool, ScatterWriter, Table2d};
use rayon::prelude::*;

use crate::{digit, GROUP_ELEMENTS, GROUP_SIZE, RADICES};

/// Local scratch one permute work-group declares: [`GROUP_SIZE`] lanes with
/// 256 `u16` running counters each.
pub const SCRATCH_BYTES: usize = GROUP_SIZE * RADICES * std::mem::size_of::<u16>();

/// Scatter `data` into `out` using the pass's scanned offsets.
///
/// `offsets` is digit-major; group `g` owns the `g`-th 256-element chunk of
/// `data` and column `g` of `offsets`. Fails on the first destination that
/// falls outside `out`.
pub fn scatter_pass(
    pool: &LanePool,
    shift: u32,
    data: &[u32],
    offsets: &Table2d<u32>,
    out: &mut [u32],
) -> Result<(), ExecError> {
    debug_assert_eq!(data.len(), out.len());
    debug_assert_eq!(offsets.rows(), RADICES);
    debug_assert_eq!(offsets.cols() * GROUP_ELEMENTS, data.len());

    let writer = ScatterWriter::new(out);
    pool.submit(|| {
        data.par_chunks(GROUP_ELEMENTS)
            .enumerate()
            .try_for_each(|(g, slice)| {
                // Private counter row for this group, advanced in element order.
                let mut counters = [0u32; RADICES];
                for (d, counter) in counters.iter_mut().enumerate() {
                    *counter = offsets.get(d, g);
                }

                for &key in slice {
                    let d = digit(key, shift);
                    let dest = counters[d] as usize;
                    counters[d] += 1;
                    // SAFETY: bucket ranges of distinct groups are disjoint
                    // and this cell's counter is monotonic, so no other lane
                    // writes `dest`.
                    unsafe { writer.write(dest, key)? };
                }
                Ok(())
            })
    })
}
