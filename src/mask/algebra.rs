//! Pure mask combinatorics.
//!
//! These helpers model what a single `GROUP BY ... WITH ROLLUP` pass can
//! produce, which is everything the grouper needs to search for a cover.

use super::{Grouping, Mask};

/// All `2^num_dims` masks of the given width, all-ones first.
///
/// The result grows exponentially; callers bound `num_dims` before asking
/// for the full power set.
pub fn all_masks(num_dims: usize) -> Vec<Mask> {
    let top = Mask::ones(num_dims).bits();
    (0..=top)
        .rev()
        .map(|bits| Mask::from_bits(num_dims, bits))
        .collect()
}

/// Ascending 1-based positions of the detailed dimensions of `mask`.
///
/// `101` becomes `[1, 3]`.
pub fn grouping_from_mask(mask: Mask) -> Grouping {
    Grouping::new(mask.positions().collect())
}

/// Every ordering of `grouping`, in lexicographic order of the input's index
/// order.
///
/// For an ascending input (as produced by [`grouping_from_mask`]) this is
/// plain lexicographic order: `[1, 2, 3]` yields `123, 132, 213, 231, 312, 321`.
/// The grouper's tie-break depends on this order.
///
/// Orderings are produced one at a time. There are `k!` of them for an
/// input of length `k`, but only one is held in memory.
pub fn permutations(grouping: &Grouping) -> Permutations {
    let items = grouping.positions().to_vec();
    Permutations {
        indices: (0..items.len()).collect(),
        items,
        done: false,
    }
}

/// Iterator returned by [`permutations`].
#[derive(Debug, Clone)]
pub struct Permutations {
    items: Vec<usize>,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for Permutations {
    type Item = Grouping;

    fn next(&mut self) -> Option<Grouping> {
        if self.done {
            return None;
        }
        let current = Grouping::new(self.indices.iter().map(|&i| self.items[i]).collect());
        self.done = !next_permutation(&mut self.indices);
        Some(current)
    }
}

impl std::iter::FusedIterator for Permutations {}

/// Masks emitted by `GROUP BY p1, ..., pk WITH ROLLUP`.
///
/// Starts from the full grouping and drops the last column one level at a
/// time, ending with the grand total: `[1, 2]` over 3 dimensions covers
/// `110, 100, 000`.
pub fn rollup_coverage(grouping: &Grouping, num_dims: usize) -> Vec<Mask> {
    let positions = grouping.positions();
    (0..=positions.len())
        .rev()
        .map(|len| Mask::from_positions(num_dims, &positions[..len]))
        .collect()
}

/// Advance `indices` to the next lexicographic permutation.
///
/// Returns `false` once the last permutation has been reached.
fn next_permutation(indices: &mut [usize]) -> bool {
    let Some(pivot) = indices.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let Some(successor) = indices.iter().rposition(|&x| x > indices[pivot]) else {
        return false;
    };
    indices.swap(pivot, successor);
    indices[pivot + 1..].reverse();
    true
}
