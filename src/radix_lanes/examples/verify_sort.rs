//! Fill a buffer with random keys, sort it on the lane pool, and verify the
//! result against the sequential reference.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, Level};

use radix_lanes::{verify_sort, RadixSorter, SortConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    // Ask for more than the cap to show the driver-style normalization.
    let config = SortConfig::rounded(100_000);
    info!(
        "sorting {} elements in {} groups",
        config.element_count(),
        config.num_groups()
    );

    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let data: Vec<u32> = (0..config.element_count()).map(|_| rng.gen()).collect();

    let mut sorter = RadixSorter::new(config)?;
    let sorted = sorter.sort(&data)?;

    let report = verify_sort(&data, &sorted);
    if report.passed() {
        info!("verification passed: {} elements match the reference", report.compared);
    } else {
        info!(
            "verification FAILED: {} of {} positions differ",
            report.mismatch_count, report.compared
        );
        for m in &report.mismatches {
            info!("  [{}] found {} expected {}", m.index, m.found, m.expected);
        }
    }

    Ok(())
}
