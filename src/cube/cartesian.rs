//! Upper bound on the number of rows a cube can produce.

use crate::mask::Mask;

/// Sum, over every mask, of the product of distinct-value counts of the
/// dimensions the mask groups by.
///
/// `distinct_counts[i]` is the count for position `i + 1`. The all-zeros mask
/// contributes 1 (the grand total row). Arithmetic saturates at `u64::MAX`.
pub fn cartesian_count(masks: &[Mask], distinct_counts: &[u64]) -> u64 {
    masks.iter().fold(0u64, |total, mask| {
        let product = mask
            .positions()
            .map(|pos| distinct_counts.get(pos - 1).copied().unwrap_or(0))
            .fold(1u64, u64::saturating_mul);
        total.saturating_add(product)
    })
}
