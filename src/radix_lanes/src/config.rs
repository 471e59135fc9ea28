//! Sort geometry: validation and normalization of element counts.

use tracing::warn;

use crate::error::SortError;
use crate::{GROUP_ELEMENTS, GROUP_SIZE, MAX_ELEMENTS, TILE_ELEMENTS};

/// Validated sort geometry for one element count.
///
/// Construction is the configuration gate: every size limit is checked here,
/// before any buffer exists or dispatch runs. The derived group and tile
/// counts are what the scan plan and table shapes are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    element_count: usize,
    num_groups: usize,
    num_tiles: usize,
}

impl SortConfig {
    /// Validate an element count.
    ///
    /// The count must be a power of two, a multiple of [`TILE_ELEMENTS`],
    /// and at most [`MAX_ELEMENTS`], which leaves exactly three legal sizes:
    /// 16384, 32768, and 65536.
    pub fn new(element_count: usize) -> Result<Self, SortError> {
        if element_count > MAX_ELEMENTS {
            return Err(SortError::CountExceedsCap {
                count: element_count,
                max: MAX_ELEMENTS,
            });
        }
        if element_count == 0
            || !element_count.is_power_of_two()
            || element_count % TILE_ELEMENTS != 0
        {
            return Err(SortError::CountNotTileable {
                count: element_count,
                tile: TILE_ELEMENTS,
            });
        }
        Ok(Self::from_legal_count(element_count))
    }

    /// Normalize an arbitrary requested count to the nearest legal one, the
    /// way the surrounding driver sizes its buffers: round up to a power of
    /// two, raise to the minimum tile, clamp to the cap.
    pub fn rounded(requested: usize) -> Self {
        let mut count = requested.max(1).next_power_of_two();
        if count < TILE_ELEMENTS {
            count = TILE_ELEMENTS;
        }
        if count > MAX_ELEMENTS {
            warn!(
                "requested {} elements, clamping to the {}-element cap",
                requested, MAX_ELEMENTS
            );
            count = MAX_ELEMENTS;
        }
        Self::from_legal_count(count)
    }

    fn from_legal_count(element_count: usize) -> Self {
        let num_groups = element_count / GROUP_ELEMENTS;
        Self {
            element_count,
            num_groups,
            num_tiles: num_groups / GROUP_SIZE,
        }
    }

    /// Number of elements the sorter processes.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Number of counting/permute work-groups, one per 256-element slice.
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Number of scan tiles ([`GROUP_SIZE`] groups each).
    pub fn num_tiles(&self) -> usize {
        self.num_tiles
    }
}
