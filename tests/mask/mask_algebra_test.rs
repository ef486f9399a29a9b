//! Tests for mask parsing and the combinatorics the grouper searches with.

use std::collections::HashSet;

use cubify::mask::{all_masks, grouping_from_mask, permutations, rollup_coverage, Grouping, Mask};

fn mask(s: &str) -> Mask {
    Mask::parse(s).unwrap()
}

fn rendered(masks: &[Mask]) -> Vec<String> {
    masks.iter().map(ToString::to_string).collect()
}

// ============================================================================
// all_masks
// ============================================================================

#[test]
fn test_all_masks_two_dimensions() {
    assert_eq!(rendered(&all_masks(2)), vec!["11", "10", "01", "00"]);
}

#[test]
fn test_all_masks_size_and_distinctness() {
    for n in 1..=8 {
        let masks = all_masks(n);
        assert_eq!(masks.len(), 1 << n, "size for N={}", n);
        assert!(masks.iter().all(|m| m.width() == n));

        let unique: HashSet<_> = masks.iter().collect();
        assert_eq!(unique.len(), masks.len(), "duplicates for N={}", n);
        assert!(masks[0].is_ones());
    }
}

// ============================================================================
// grouping_from_mask / permutations
// ============================================================================

#[test]
fn test_grouping_from_mask() {
    assert_eq!(grouping_from_mask(mask("1011")).positions(), &[1, 3, 4]);
    assert!(grouping_from_mask(mask("000")).is_empty());
}

#[test]
fn test_permutations_are_lexicographic() {
    let names: Vec<String> = permutations(&Grouping::new(vec![1, 2, 3]))
        .map(|g| g.to_string())
        .collect();
    assert_eq!(names, vec!["123", "132", "213", "231", "312", "321"]);
}

#[test]
fn test_permutations_of_empty_grouping() {
    let perms: Vec<Grouping> = permutations(&Grouping::new(vec![])).collect();
    assert_eq!(perms.len(), 1);
    assert!(perms[0].is_empty());
}

#[test]
fn test_permutation_count() {
    let perms: Vec<Grouping> = permutations(&Grouping::new(vec![1, 2, 3, 4, 5])).collect();
    assert_eq!(perms.len(), 120);
    let unique: HashSet<String> = perms.iter().map(ToString::to_string).collect();
    assert_eq!(unique.len(), 120);
}

// ============================================================================
// rollup_coverage
// ============================================================================

#[test]
fn test_rollup_coverage_drops_trailing_columns() {
    let coverage = rollup_coverage(&Grouping::new(vec![2, 4]), 4);
    assert_eq!(rendered(&coverage), vec!["0101", "0100", "0000"]);
}

#[test]
fn test_rollup_coverage_of_empty_grouping() {
    assert_eq!(rendered(&rollup_coverage(&Grouping::new(vec![]), 3)), vec!["000"]);
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_errors() {
    assert!(Mask::parse("").is_err());
    assert!(Mask::parse("10a1").is_err());
    assert!(Mask::parse(&"1".repeat(65)).is_err());
    assert!(Mask::parse(&"1".repeat(64)).is_ok());
}

#[test]
fn test_grouping_display_with_two_digit_positions() {
    assert_eq!(Grouping::new(vec![3, 1, 2]).to_string(), "312");
    assert_eq!(Grouping::new(vec![10, 2]).to_string(), "10,2");
}
