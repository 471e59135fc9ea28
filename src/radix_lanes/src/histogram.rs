//! Counting stage: per-group digit histograms.
//!
//! Each work-group owns one 256-element slice of the working array and one
//! row of the group-major counts table. The group accumulates into a private
//! 256-bin array (the local-scratch analog, one `u32` bin per digit value)
//! and then publishes the whole row, fully replacing the previous pass's
//! counts. Rows are disjoint, so all groups count concurrently without
//! coordination.

use lane_exec::{LanePool, Table2d};
use rayon::prelude::*;

use crate::{digit, GROUP_ELEMENTS, RADICES};

/// Local scratch one counting group declares: one `u32` bin per digit.
pub const SCRATCH_BYTES: usize = RADICES * std::mem::size_of::<u32>();

/// Count digit occurrences per group for the pass at bit offset `shift`.
///
/// `data` must hold exactly [`GROUP_ELEMENTS`] elements per row of `counts`;
/// row `g` receives the histogram of group `g`'s slice.
pub fn count_digits(pool: &LanePool, shift: u32, data: &[u32], counts: &mut Table2d<u32>) {
    debug_assert_eq!(data.len(), counts.rows() * GROUP_ELEMENTS);
    debug_assert_eq!(counts.cols(), RADICES);

    pool.submit(|| {
        counts
            .par_rows_mut()
            .zip(data.par_chunks(GROUP_ELEMENTS))
            .for_each(|(row, slice)| {
                let mut bins = [0u32; RADICES];
                for &key in slice {
                    bins[digit(key, shift)] += 1;
                }
                row.copy_from_slice(&bins);
            });
    });
}
