//! Stable multi-pass radix sort of `u32` keys over lane-parallel work-groups.
//!
//! Sorts arrays of unsigned 32-bit integers with a four-pass
//! least-significant-digit radix sort, 8 bits per pass. Each pass is a fixed
//! sequence of data-parallel dispatches over work-groups:
//!
//! 1. **Histogram** ([`histogram`]): each group counts the digits of its
//!    256-element slice into a private 256-bin histogram and publishes the
//!    row.
//! 2. **Hierarchical scan** ([`scan`]): per-group counts become global
//!    exclusive offsets through up to three tiers (intra-tile, inter-tile,
//!    cross-digit).
//! 3. **Permute** ([`permute`]): each group scatters its slice to the
//!    scanned offsets, preserving the order of equal keys.
//!
//! Groups never synchronize with each other inside a dispatch. All
//! cross-group ordering comes from the blocking dispatch boundaries
//! ([`lane_exec::LanePool::submit`]), and the shared tables are partitioned
//! by (group, digit) so no two lanes write the same cell within a stage.
//!
//! The result is verified bit-for-bit against a sequential reference sort
//! ([`reference`], [`verify`]); both paths are stable under the same
//! tie-break rule, so their outputs must match exactly.
//!
//! # Example
//!
//! ```ignore
//! use radix_lanes::{verify_sort, RadixSorter, SortConfig};
//!
//! let config = SortConfig::new(data.len())?;
//! let mut sorter = RadixSorter::new(config)?;
//! let sorted = sorter.sort(&data)?;
//! assert!(verify_sort(&data, &sorted).passed());
//! ```

pub mod config;
pub mod error;
pub mod histogram;
pub mod permute;
pub mod reference;
pub mod scan;
pub mod sorter;
pub mod verify;

pub use config::SortConfig;
pub use error::SortError;
pub use lane_exec::{DeviceLimits, ExecError, LanePool, Table2d};
pub use reference::reference_sort;
pub use sorter::RadixSorter;
pub use verify::{is_non_decreasing, verify_sort, Mismatch, VerifyReport};

/// Width of one digit window in bits.
pub const RADIX_BITS: u32 = 8;

/// Number of distinct digit values per pass.
pub const RADICES: usize = 1 << RADIX_BITS; // 256

/// Number of passes needed to cover a 32-bit key.
pub const PASSES: u32 = 32 / RADIX_BITS; // 4

/// Lanes per permute work-group, and groups per scan tile.
pub const GROUP_SIZE: usize = 64;

/// Elements in one counting group's slice (one lane per digit value).
pub const GROUP_ELEMENTS: usize = RADICES;

/// Elements covered by one scan tile of [`GROUP_SIZE`] groups. Legal array
/// lengths are power-of-two multiples of this.
pub const TILE_ELEMENTS: usize = GROUP_SIZE * GROUP_ELEMENTS; // 16384

/// Largest legal array. The permute stage keeps `GROUP_SIZE × 256` running
/// counters of 2 bytes each in per-group scratch, which fills the 32 KiB
/// budget of the modeled device and bounds the element count.
pub const MAX_ELEMENTS: usize = 65536;

/// Extract the pass digit of `key` at bit offset `shift`.
#[inline]
pub(crate) fn digit(key: u32, shift: u32) -> usize {
    ((key >> shift) & (RADICES as u32 - 1)) as usize
}
