//! Hierarchical scan: per-group digit counts to global exclusive offsets.
//!
//! A flat exclusive scan over the whole `num_groups × 256` histogram does
//! not fit one cooperative unit, so the scan runs in tiers:
//!
//! 1. **Tile scan**: for each digit independently, exclusive-scan its
//!    per-group counts in tiles of [`GROUP_SIZE`] groups, recording each
//!    tile's total.
//! 2. **Tile prefix + block addition** (multi-tile plans only):
//!    exclusive-scan the tile totals per digit and add every tile's start
//!    back into its groups, making offsets correct across the whole digit
//!    column. The per-digit grand totals fall out of this scan.
//! 3. **Summary scan + fix offset**: exclusive-scan the 256 per-digit grand
//!    totals (256 values fit a single cooperative unit), then add each
//!    digit's global start into that digit's whole column, so digit `d`'s
//!    buckets begin right after digit `d-1`'s entire range.
//!
//! Afterwards `offsets[d][g]` is the destination of the first element of
//! group `g` carrying digit `d`. Every scan is exclusive, so elements with
//! equal digits keep their input order; that is the stability guarantee each
//! pass hands to the next.
//!
//! The offsets table is digit-major (one row per digit) so every tier hands
//! whole rows to parallel tasks, while the counts table it consumes stays
//! group-major. A tiered run is five dispatches, a single-tile run three,
//! each completing before the next is submitted.

use lane_exec::{alloc_zeroed, ExecError, LanePool, Table2d};
use rayon::prelude::*;
use tracing::debug;

use crate::{GROUP_SIZE, RADICES};

/// Dispatch strategy for one run, fixed by the group count at setup.
///
/// Selecting the plan once keeps the tier-2 skip in a single place instead
/// of a branch at every call site; `num_groups == GROUP_SIZE` is the
/// identity case where one tile already spans every group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPlan {
    num_groups: usize,
    num_tiles: usize,
}

impl ScanPlan {
    /// Plan the scan of `num_groups` group counts per digit.
    pub fn for_groups(num_groups: usize) -> Self {
        assert!(
            num_groups > 0 && num_groups % GROUP_SIZE == 0,
            "group count must be a positive multiple of the tile width"
        );
        Self {
            num_groups,
            num_tiles: num_groups / GROUP_SIZE,
        }
    }

    /// Groups scanned per digit.
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Tiles per digit column.
    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }

    /// Whether the inter-tile tier runs.
    pub fn tiered(&self) -> bool {
        self.num_tiles > 1
    }

    /// Number of dispatches one pass of this plan submits.
    pub fn dispatch_count(&self) -> usize {
        if self.tiered() {
            5
        } else {
            3
        }
    }
}

/// Auxiliary tables for the inter-tile and cross-digit tiers.
///
/// Allocated once at setup and rebuilt every pass. The tile tables are
/// digit-major (`256 × num_tiles`); the summary rows hold one entry per
/// digit value.
#[derive(Debug)]
pub struct ScanScratch {
    tile_totals: Table2d<u32>,
    tile_starts: Table2d<u32>,
    digit_totals: Vec<u32>,
    digit_starts: Vec<u32>,
}

impl ScanScratch {
    /// Allocate scratch sized for `plan`.
    pub fn new(plan: ScanPlan) -> Result<Self, ExecError> {
        Ok(Self {
            tile_totals: Table2d::zeroed(RADICES, plan.num_tiles())?,
            tile_starts: Table2d::zeroed(RADICES, plan.num_tiles())?,
            digit_totals: alloc_zeroed(RADICES)?,
            digit_starts: alloc_zeroed(RADICES)?,
        })
    }
}

/// Turn the group-major `counts` into global exclusive offsets for one pass.
///
/// `offsets` is digit-major and fully rewritten. Each dispatch completes
/// before the next one reads its output.
pub fn scan_offsets(
    pool: &LanePool,
    plan: ScanPlan,
    counts: &Table2d<u32>,
    scratch: &mut ScanScratch,
    offsets: &mut Table2d<u32>,
) {
    debug_assert_eq!(counts.rows(), plan.num_groups());
    debug_assert_eq!(counts.cols(), RADICES);
    debug_assert_eq!(offsets.rows(), RADICES);
    debug_assert_eq!(offsets.cols(), plan.num_groups());

    debug!(
        "scan: {} groups in {} tiles, {} dispatches",
        plan.num_groups(),
        plan.num_tiles(),
        plan.dispatch_count()
    );

    pool.submit(|| tile_scan(plan, counts, &mut scratch.tile_totals, &mut *offsets));

    if plan.tiered() {
        pool.submit(|| {
            tile_prefix(
                &scratch.tile_totals,
                &mut scratch.tile_starts,
                &mut scratch.digit_totals,
            )
        });
        pool.submit(|| block_addition(&scratch.tile_starts, &mut *offsets));
    } else {
        // One tile spans every group, so its totals already are the
        // per-digit grand totals.
        for d in 0..RADICES {
            scratch.digit_totals[d] = scratch.tile_totals.get(d, 0);
        }
    }

    pool.submit(|| exclusive_scan_into(&scratch.digit_totals, &mut scratch.digit_starts));
    pool.submit(|| fix_offsets(&scratch.digit_starts, &mut *offsets));
}

/// Tier 1: exclusive scan of each digit's group counts within each tile,
/// tile totals out. One task per digit column; the column's tiles scan
/// independently of each other.
fn tile_scan(
    plan: ScanPlan,
    counts: &Table2d<u32>,
    tile_totals: &mut Table2d<u32>,
    offsets: &mut Table2d<u32>,
) {
    offsets
        .par_rows_mut()
        .zip(tile_totals.par_rows_mut())
        .enumerate()
        .for_each(|(d, (offset_row, totals_row))| {
            for t in 0..plan.num_tiles() {
                let base = t * GROUP_SIZE;
                let mut sum = 0u32;
                for g in base..base + GROUP_SIZE {
                    offset_row[g] = sum;
                    sum += counts.get(g, d);
                }
                totals_row[t] = sum;
            }
        });
}

/// Tier 2a: exclusive scan of each digit's tile totals, grand total out.
fn tile_prefix(
    tile_totals: &Table2d<u32>,
    tile_starts: &mut Table2d<u32>,
    digit_totals: &mut [u32],
) {
    tile_starts
        .par_rows_mut()
        .zip(digit_totals.par_iter_mut())
        .enumerate()
        .for_each(|(d, (starts_row, total))| {
            let mut sum = 0u32;
            for (t, start) in starts_row.iter_mut().enumerate() {
                *start = sum;
                sum += tile_totals.get(d, t);
            }
            *total = sum;
        });
}

/// Tier 2b: broadcast each tile's start into all of that tile's groups.
fn block_addition(tile_starts: &Table2d<u32>, offsets: &mut Table2d<u32>) {
    offsets.par_rows_mut().enumerate().for_each(|(d, offset_row)| {
        for (t, tile) in offset_row.chunks_mut(GROUP_SIZE).enumerate() {
            let start = tile_starts.get(d, t);
            for cell in tile {
                *cell += start;
            }
        }
    });
}

/// Exclusive prefix sum of `input` into `output` (single cooperative unit).
fn exclusive_scan_into(input: &[u32], output: &mut [u32]) {
    debug_assert_eq!(input.len(), output.len());
    let mut sum = 0u32;
    for (out, &value) in output.iter_mut().zip(input) {
        *out = sum;
        sum += value;
    }
}

/// Tier 3: add each digit's global start into its whole column.
fn fix_offsets(digit_starts: &[u32], offsets: &mut Table2d<u32>) {
    offsets
        .par_rows_mut()
        .zip(digit_starts.par_iter())
        .for_each(|(offset_row, &start)| {
            for cell in offset_row {
                *cell += start;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> LanePool {
        LanePool::new().unwrap()
    }

    /// Synthetic group-major counts with an uneven but deterministic shape.
    fn synthetic_counts(num_groups: usize) -> Table2d<u32> {
        let mut counts = Table2d::zeroed(num_groups, RADICES).unwrap();
        for g in 0..num_groups {
            let row = counts.row_mut(g);
            for (d, cell) in row.iter_mut().enumerate() {
                *cell = ((g * 7 + d * 3) % 5) as u32;
            }
        }
        counts
    }

    /// Offsets computed the slow, obviously correct way:
    /// everything in digits below `d`, plus digit `d` in groups below `g`.
    fn naive_offsets(counts: &Table2d<u32>) -> Table2d<u32> {
        let num_groups = counts.rows();
        let mut expected = Table2d::zeroed(RADICES, num_groups).unwrap();

        let mut digit_start = 0u32;
        for d in 0..RADICES {
            let row = expected.row_mut(d);
            let mut sum = digit_start;
            for g in 0..num_groups {
                row[g] = sum;
                sum += counts.get(g, d);
            }
            digit_start = sum;
        }
        expected
    }

    fn run_scan(num_groups: usize) -> (Table2d<u32>, Table2d<u32>) {
        let plan = ScanPlan::for_groups(num_groups);
        let counts = synthetic_counts(num_groups);
        let mut scratch = ScanScratch::new(plan).unwrap();
        let mut offsets = Table2d::zeroed(RADICES, num_groups).unwrap();

        scan_offsets(&pool(), plan, &counts, &mut scratch, &mut offsets);
        let expected = naive_offsets(&counts);
        (offsets, expected)
    }

    #[test]
    fn test_plan_single_tile() {
        let plan = ScanPlan::for_groups(GROUP_SIZE);
        assert_eq!(plan.num_tiles(), 1);
        assert!(!plan.tiered());
        assert_eq!(plan.dispatch_count(), 3);
    }

    #[test]
    fn test_plan_tiered() {
        let plan = ScanPlan::for_groups(4 * GROUP_SIZE);
        assert_eq!(plan.num_tiles(), 4);
        assert!(plan.tiered());
        assert_eq!(plan.dispatch_count(), 5);
    }

    #[test]
    fn test_exclusive_scan_into() {
        let input = [1, 2, 3, 4, 5];
        let mut output = [0u32; 5];
        exclusive_scan_into(&input, &mut output);
        assert_eq!(output, [0, 1, 3, 6, 10]);
    }

    #[test]
    fn test_single_tile_matches_naive() {
        let (offsets, expected) = run_scan(GROUP_SIZE);
        for d in 0..RADICES {
            assert_eq!(offsets.row(d), expected.row(d), "digit {}", d);
        }
    }

    #[test]
    fn test_two_tiles_match_naive() {
        let (offsets, expected) = run_scan(2 * GROUP_SIZE);
        for d in 0..RADICES {
            assert_eq!(offsets.row(d), expected.row(d), "digit {}", d);
        }
    }

    #[test]
    fn test_four_tiles_match_naive() {
        let (offsets, expected) = run_scan(4 * GROUP_SIZE);
        for d in 0..RADICES {
            assert_eq!(offsets.row(d), expected.row(d), "digit {}", d);
        }
    }

    #[test]
    fn test_offsets_start_at_zero_and_cover_all_counts() {
        let num_groups = 2 * GROUP_SIZE;
        let plan = ScanPlan::for_groups(num_groups);
        let counts = synthetic_counts(num_groups);
        let mut scratch = ScanScratch::new(plan).unwrap();
        let mut offsets = Table2d::zeroed(RADICES, num_groups).unwrap();
        scan_offsets(&pool(), plan, &counts, &mut scratch, &mut offsets);

        assert_eq!(offsets.get(0, 0), 0);

        // The last bucket's offset plus its count equals the total.
        let total: u32 = (0..num_groups)
            .map(|g| counts.row(g).iter().sum::<u32>())
            .sum();
        let last = offsets.get(RADICES - 1, num_groups - 1)
            + counts.get(num_groups - 1, RADICES - 1);
        assert_eq!(last, total);
    }

    #[test]
    fn test_scratch_is_rebuilt_between_passes() {
        // Two scans over different counts through the same scratch must not
        // leak state from the first into the second.
        let num_groups = 2 * GROUP_SIZE;
        let plan = ScanPlan::for_groups(num_groups);
        let mut scratch = ScanScratch::new(plan).unwrap();
        let mut offsets = Table2d::zeroed(RADICES, num_groups).unwrap();

        let first = synthetic_counts(num_groups);
        scan_offsets(&pool(), plan, &first, &mut scratch, &mut offsets);

        let mut second = Table2d::zeroed(num_groups, RADICES).unwrap();
        for g in 0..num_groups {
            second.row_mut(g)[0] = 1;
        }
        scan_offsets(&pool(), plan, &second, &mut scratch, &mut offsets);

        let expected = naive_offsets(&second);
        for d in 0..RADICES {
            assert_eq!(offsets.row(d), expected.row(d), "digit {}", d);
        }
    }
}
