//! Sequential reference sort used to validate the parallel pipeline.
//!
//! Same four-pass, 8-bit LSD decomposition as the parallel path, but with a
//! single flat 256-bucket histogram per pass and a trivial exclusive scan.
//! Both sorts are stable under the same tie-break rule (input order), so
//! their outputs must match element for element, not merely as multisets.

use crate::{digit, PASSES, RADICES, RADIX_BITS};

/// Sort `input` ascending with a flat CPU radix sort.
pub fn reference_sort(input: &[u32]) -> Vec<u32> {
    let n = input.len();
    if n == 0 {
        return Vec::new();
    }

    let mut keys = input.to_vec();
    let mut scratch = vec![0u32; n];

    for pass in 0..PASSES {
        let shift = pass * RADIX_BITS;

        // Count digit frequencies.
        let mut hist = [0usize; RADICES];
        for &key in &keys {
            hist[digit(key, shift)] += 1;
        }

        // Exclusive prefix sum over the 256 buckets.
        let mut offsets = [0usize; RADICES];
        let mut sum = 0;
        for d in 0..RADICES {
            offsets[d] = sum;
            sum += hist[d];
        }

        // Stable scatter in input order.
        let mut placed = [0usize; RADICES];
        for i in 0..n {
            let d = digit(keys[i], shift);
            scratch[offsets[d] + placed[d]] = keys[i];
            placed[d] += 1;
        }

        std::mem::swap(&mut keys, &mut scratch);
    }

    keys
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_sorts_small_list() {
        let input = vec![5u32, 3, 8, 1, 9, 2, 7, 4, 6, 0];
        assert_eq!(reference_sort(&input), (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn test_handles_duplicates() {
        let input = vec![3u32, 1, 3, 1, 3];
        assert_eq!(reference_sort(&input), vec![1, 1, 3, 3, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(reference_sort(&[]).is_empty());
    }

    #[test]
    fn test_all_equal() {
        let input = vec![42u32; 100];
        assert_eq!(reference_sort(&input), input);
    }

    #[test]
    fn test_orders_by_high_bytes() {
        // Keys differing only above bit 24 exercise the final pass.
        let input = vec![3u32 << 24, 1 << 24, 2 << 24];
        assert_eq!(reference_sort(&input), vec![1 << 24, 2 << 24, 3 << 24]);
    }

    #[test]
    fn test_matches_std_sort_on_random_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<u32> = (0..4096).map(|_| rng.gen()).collect();

        let mut expected = input.clone();
        expected.sort_unstable();
        assert_eq!(reference_sort(&input), expected);
    }
}
