//! Grouping optimization.
//!
//! A grouper turns the set of masks a cube must produce into a
//! [`CoveringPlan`]: the `GROUP BY` column orders to run, each marked flat or
//! rollup. The output does not depend on any SQL flavour.
//!
//! # Example
//!
//! ```
//! use cubify::grouper::{BaseGrouper, Grouper, MaskSelection};
//!
//! let grouper = BaseGrouper::new(3, &MaskSelection::explicit(["111", "001"])).unwrap();
//! let plan = grouper.groupings();
//! assert_eq!(plan.to_string(), "312 => rollup");
//! ```

mod base;
mod plan;
mod selection;

pub use base::BaseGrouper;
pub use plan::{CoveringPlan, DetailedPlan, GroupingKind};
pub use selection::{MaskSelection, MAX_ALL_DIMENSIONS};

use std::fmt;

use crate::mask::{all_masks, Mask};

/// Produces a covering plan for a fixed set of masks.
pub trait Grouper: fmt::Debug {
    /// Number of dimensions every mask spans.
    fn num_dims(&self) -> usize;

    /// Groupings that together produce every requested mask.
    fn groupings(&self) -> CoveringPlan;

    /// Every mask that can exist for this grouper's dimensions, all-ones
    /// first.
    fn all_masks(&self) -> Vec<Mask> {
        all_masks(self.num_dims())
    }
}
