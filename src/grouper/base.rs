//! Greedy covering grouper.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::plan::CoveringPlan;
use super::selection::MaskSelection;
use super::Grouper;
use crate::error::ValidationError;
use crate::mask::{grouping_from_mask, permutations, rollup_coverage, Grouping, Mask};

/// Covers the requested masks with as few ROLLUP / flat passes as a greedy
/// search finds.
///
/// Masks are processed most-detailed first. For each mask not yet covered,
/// every column order of its detailed dimensions is tried and the order whose
/// ROLLUP levels cover the most still-uncovered masks wins. Ties go to the
/// order generated first (lexicographic), so output is deterministic.
///
/// The result is complete but not guaranteed minimal. Cost is `O(k!)` per
/// processed mask with `k` detailed dimensions.
#[derive(Debug, Clone)]
pub struct BaseGrouper {
    num_dims: usize,
    masks: Vec<Mask>,
}

impl BaseGrouper {
    /// Validate `selection` against `num_dims` and prepare the working set.
    pub fn new(num_dims: usize, selection: &MaskSelection) -> Result<Self, ValidationError> {
        let masks = selection.resolve(num_dims)?;
        Ok(Self::from_masks(num_dims, masks))
    }

    /// Like [`BaseGrouper::new`], inferring the number of dimensions from the
    /// first explicit mask. `num_dims` is required for [`MaskSelection::All`].
    pub fn infer(selection: &MaskSelection, num_dims: Option<usize>) -> Result<Self, ValidationError> {
        let num_dims = match (selection, num_dims) {
            (_, Some(n)) => n,
            (MaskSelection::All, None) => return Err(ValidationError::AllWithoutDimensions),
            (MaskSelection::Explicit(_), None) => selection
                .inferred_dimensions()
                .ok_or(ValidationError::NoMasks)?,
        };
        Self::new(num_dims, selection)
    }

    /// Working set from already-validated masks: the all-ones mask is added
    /// when missing, then masks are stably sorted by descending popcount.
    pub(crate) fn from_masks(num_dims: usize, mut masks: Vec<Mask>) -> Self {
        let top = Mask::ones(num_dims);
        if !masks.contains(&top) {
            masks.push(top);
        }
        masks.sort_by(|a, b| b.count_ones().cmp(&a.count_ones()));

        Self { num_dims, masks }
    }

    /// The working set in processing order.
    pub fn masks(&self) -> &[Mask] {
        &self.masks
    }

    /// Choose the column order for `mask` that covers the most uncovered
    /// masks. Returns the winner and the indices of the masks it covers.
    fn best_grouping_for(
        &self,
        mask: Mask,
        index: &HashMap<Mask, usize>,
        producer: &[Option<usize>],
    ) -> (Grouping, Vec<usize>) {
        let mut best: Option<(Grouping, Vec<usize>)> = None;

        for candidate in permutations(&grouping_from_mask(mask)) {
            let covered: Vec<usize> = rollup_coverage(&candidate, self.num_dims)
                .into_iter()
                .filter_map(|m| index.get(&m).copied())
                .filter(|&i| producer[i].is_none())
                .collect();

            trace!(grouping = %candidate, score = covered.len(), "scored candidate");

            let better = match &best {
                Some((_, current)) => covered.len() > current.len(),
                None => true,
            };
            if better {
                best = Some((candidate, covered));
            }
        }

        // permutations() always yields at least one ordering
        best.unwrap_or_else(|| (grouping_from_mask(mask), Vec::new()))
    }
}

impl Grouper for BaseGrouper {
    fn num_dims(&self) -> usize {
        self.num_dims
    }

    fn groupings(&self) -> CoveringPlan {
        let index: HashMap<Mask, usize> = self
            .masks
            .iter()
            .enumerate()
            .map(|(i, m)| (*m, i))
            .collect();
        let mut producer: Vec<Option<usize>> = vec![None; self.masks.len()];
        let mut winners: Vec<Grouping> = Vec::new();

        for (i, &mask) in self.masks.iter().enumerate() {
            if producer[i].is_some() {
                continue;
            }

            let (winner, covered) = self.best_grouping_for(mask, &index, &producer);
            let slot = winners.len();
            for j in covered {
                producer[j] = Some(slot);
            }
            debug!(mask = %mask, grouping = %winner, "assigned producer");
            winners.push(winner);
        }

        let assignments = self
            .masks
            .iter()
            .zip(producer)
            .filter_map(|(mask, slot)| slot.map(|s| (*mask, s)))
            .collect();

        let plan = CoveringPlan::from_assignments(self.num_dims, winners, assignments);
        debug!(
            masks = self.masks.len(),
            groupings = plan.len(),
            "computed covering plan"
        );
        plan
    }
}
