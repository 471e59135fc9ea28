//! Capability limits of the modeled compute device.

use crate::error::ExecError;

/// Limits a pipeline must validate its work-groups against before running.
///
/// The defaults describe the hardware tier the radix pipeline was shaped by:
/// work-groups of up to 256 lanes sharing 32 KiB of local scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLimits {
    /// Maximum number of lanes in one work-group.
    pub max_group_width: usize,
    /// Local scratch memory available to one work-group, in bytes.
    pub local_mem_bytes: usize,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            max_group_width: 256,
            local_mem_bytes: 32 * 1024,
        }
    }
}

impl DeviceLimits {
    /// Check that a work-group of `lanes` lanes fits on the device.
    pub fn check_group_width(&self, lanes: usize) -> Result<(), ExecError> {
        if lanes > self.max_group_width {
            return Err(ExecError::GroupTooWide {
                requested: lanes,
                max: self.max_group_width,
            });
        }
        Ok(())
    }

    /// Check that a per-group scratch declaration fits the local budget.
    pub fn check_scratch(&self, bytes: usize) -> Result<(), ExecError> {
        if bytes > self.local_mem_bytes {
            return Err(ExecError::ScratchExceeded {
                required: bytes,
                budget: self.local_mem_bytes,
            });
        }
        Ok(())
    }
}
