//! Bit-for-bit verification of the parallel output.
//!
//! Runs the sequential reference over the same input snapshot and compares
//! element for element. A discrepancy is reported, never dropped: the
//! report carries the total mismatch count plus a bounded sample of
//! positions for diagnosis.

use crate::reference::reference_sort;

/// Upper bound on mismatch samples kept in a report.
pub const MISMATCH_SAMPLE_LIMIT: usize = 16;

/// One differing position between the parallel and reference outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Index into both output arrays.
    pub index: usize,
    /// Value the parallel pipeline produced.
    pub found: u32,
    /// Value the reference produced.
    pub expected: u32,
}

/// Outcome of comparing a parallel sort against the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Number of elements compared.
    pub compared: usize,
    /// Total number of differing positions.
    pub mismatch_count: usize,
    /// At most [`MISMATCH_SAMPLE_LIMIT`] of the differing positions.
    pub mismatches: Vec<Mismatch>,
}

impl VerifyReport {
    /// True when the outputs agreed at every position.
    pub fn passed(&self) -> bool {
        self.mismatch_count == 0
    }
}

/// Compare `sorted` against the reference sort of `input`.
///
/// `sorted` must have the same length as `input` (it is supposed to be a
/// permutation of it).
pub fn verify_sort(input: &[u32], sorted: &[u32]) -> VerifyReport {
    assert_eq!(input.len(), sorted.len(), "output length must match input length");
    compare(sorted, &reference_sort(input))
}

/// Element-for-element comparison of a produced output against an expected
/// one.
pub fn compare(found: &[u32], expected: &[u32]) -> VerifyReport {
    assert_eq!(found.len(), expected.len(), "compared slices must match in length");

    let mut report = VerifyReport {
        compared: found.len(),
        mismatch_count: 0,
        mismatches: Vec::new(),
    };
    for (index, (&f, &e)) in found.iter().zip(expected).enumerate() {
        if f != e {
            report.mismatch_count += 1;
            if report.mismatches.len() < MISMATCH_SAMPLE_LIMIT {
                report.mismatches.push(Mismatch {
                    index,
                    found: f,
                    expected: e,
                });
            }
        }
    }
    report
}

/// True when `data` is non-decreasing.
pub fn is_non_decreasing(data: &[u32]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}
