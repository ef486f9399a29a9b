//! Properties every covering plan must satisfy, checked over many inputs.

use cubify::grouper::{BaseGrouper, CoveringPlan, Grouper, GroupingKind, MaskSelection};
use cubify::mask::{all_masks, rollup_coverage, Mask};

/// Deterministic subsets of the power set for `num_dims`, chosen by walking
/// the bit patterns of `seed`.
fn subsets(num_dims: usize) -> Vec<Vec<Mask>> {
    let masks = all_masks(num_dims);
    let total = masks.len();
    (1u64..64)
        .map(|seed| {
            masks
                .iter()
                .enumerate()
                .filter(|(i, _)| (seed.wrapping_mul(2_654_435_761) >> (i % 32)) & 1 == 1 || *i == total - 1)
                .map(|(_, m)| *m)
                .collect()
        })
        .collect()
}

fn plan(num_dims: usize, masks: &[Mask]) -> CoveringPlan {
    let selection = MaskSelection::explicit(masks.iter().map(ToString::to_string));
    BaseGrouper::new(num_dims, &selection).unwrap().groupings()
}

#[test]
fn test_every_requested_mask_is_covered() {
    for n in 1..=5 {
        for masks in subsets(n) {
            let plan = plan(n, &masks);
            for mask in &masks {
                assert!(plan.covers(*mask), "N={} mask {} not covered", n, mask);
            }
            assert!(plan.covers(Mask::ones(n)));
        }
    }
}

#[test]
fn test_producer_actually_produces_the_mask() {
    for n in 1..=5 {
        for masks in subsets(n) {
            let plan = plan(n, &masks);
            for (mask, grouping) in plan.assignments() {
                let produced = match plan.kind_of(grouping) {
                    Some(GroupingKind::Rollup) => rollup_coverage(grouping, n),
                    Some(GroupingKind::Flat) => vec![grouping.mask(n)],
                    None => panic!("assignment to unknown grouping {}", grouping),
                };
                assert!(produced.contains(&mask), "{} does not produce {}", grouping, mask);
            }
        }
    }
}

#[test]
fn test_rollup_iff_more_than_one_mask() {
    for n in 1..=5 {
        for masks in subsets(n) {
            let plan = plan(n, &masks);
            for (grouping, kind) in plan.iter() {
                let produced = plan.masks_for(grouping).count();
                assert!(produced >= 1);
                assert_eq!(kind.is_rollup(), produced > 1, "grouping {}", grouping);
            }
        }
    }
}

#[test]
fn test_explicit_top_mask_is_equivalent_to_omitting_it() {
    for n in 2..=5 {
        for masks in subsets(n) {
            let without: Vec<Mask> = masks.iter().copied().filter(|m| !m.is_ones()).collect();
            if without.is_empty() {
                continue;
            }
            let mut with_top = without.clone();
            with_top.push(Mask::ones(n));
            assert_eq!(plan(n, &without), plan(n, &with_top));
        }
    }
}

#[test]
fn test_full_cube_plans_are_deterministic() {
    for n in 1..=6 {
        let grouper = BaseGrouper::new(n, &MaskSelection::All).unwrap();
        let first = grouper.groupings();
        assert_eq!(first, grouper.groupings());
        assert_eq!(first.assignments().count(), 1 << n);
    }
}
