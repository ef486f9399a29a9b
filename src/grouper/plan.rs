//! The covering plan produced by a grouper.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::mask::{Grouping, Mask};

/// How a grouping is emitted as SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingKind {
    /// Plain `GROUP BY`, producing exactly one mask.
    Flat,
    /// `GROUP BY ... WITH ROLLUP`, producing several mask levels.
    Rollup,
}

impl GroupingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingKind::Flat => "flat",
            GroupingKind::Rollup => "rollup",
        }
    }

    pub fn is_rollup(&self) -> bool {
        matches!(self, GroupingKind::Rollup)
    }
}

impl fmt::Display for GroupingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Groupings chosen to cover a set of masks, in the order they were chosen.
///
/// Every covered mask is assigned to exactly one producing grouping. A
/// grouping is [`GroupingKind::Rollup`] iff it produces more than one mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoveringPlan {
    num_dims: usize,
    groupings: Vec<(Grouping, GroupingKind)>,
    assignments: Vec<(Mask, usize)>,
}

impl CoveringPlan {
    /// Build a plan from the chosen groupings and the per-mask assignment.
    ///
    /// `assignments` pairs each covered mask with an index into `groupings`.
    /// Groupings that produce no mask are dropped.
    pub fn from_assignments(
        num_dims: usize,
        groupings: Vec<Grouping>,
        assignments: Vec<(Mask, usize)>,
    ) -> Self {
        let mut counts = vec![0usize; groupings.len()];
        for &(_, idx) in &assignments {
            counts[idx] += 1;
        }

        let mut remap = vec![usize::MAX; groupings.len()];
        let mut kept = Vec::with_capacity(groupings.len());
        for (idx, grouping) in groupings.into_iter().enumerate() {
            let kind = match counts[idx] {
                0 => continue,
                1 => GroupingKind::Flat,
                _ => GroupingKind::Rollup,
            };
            remap[idx] = kept.len();
            kept.push((grouping, kind));
        }

        let assignments = assignments
            .into_iter()
            .map(|(mask, idx)| (mask, remap[idx]))
            .collect();

        Self {
            num_dims,
            groupings: kept,
            assignments,
        }
    }

    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    pub fn len(&self) -> usize {
        self.groupings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groupings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Grouping, GroupingKind)> {
        self.groupings.iter().map(|(g, k)| (g, *k))
    }

    pub fn groupings(&self) -> impl Iterator<Item = &Grouping> {
        self.groupings.iter().map(|(g, _)| g)
    }

    pub fn kind_of(&self, grouping: &Grouping) -> Option<GroupingKind> {
        self.groupings
            .iter()
            .find(|(g, _)| g == grouping)
            .map(|(_, k)| *k)
    }

    /// The grouping responsible for producing `mask`.
    pub fn producer(&self, mask: Mask) -> Option<&Grouping> {
        self.assignments
            .iter()
            .find(|(m, _)| *m == mask)
            .map(|(_, idx)| &self.groupings[*idx].0)
    }

    /// Every covered mask with its producing grouping, in cover order.
    pub fn assignments(&self) -> impl Iterator<Item = (Mask, &Grouping)> {
        self.assignments
            .iter()
            .map(|(mask, idx)| (*mask, &self.groupings[*idx].0))
    }

    /// Masks produced by `grouping`.
    pub fn masks_for<'a>(&'a self, grouping: &'a Grouping) -> impl Iterator<Item = Mask> + 'a {
        self.assignments()
            .filter(move |(_, g)| *g == grouping)
            .map(|(mask, _)| mask)
    }

    pub fn covers(&self, mask: Mask) -> bool {
        self.producer(mask).is_some()
    }

    /// Mask -> grouping view, serializable for detailed output.
    pub fn detailed(&self) -> DetailedPlan<'_> {
        DetailedPlan(self)
    }
}

/// One line per grouping: `312 => rollup`.
impl fmt::Display for CoveringPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (grouping, kind)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} => {}", grouping, kind)?;
        }
        Ok(())
    }
}

impl Serialize for CoveringPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groupings.len()))?;
        for (grouping, kind) in self.iter() {
            map.serialize_entry(grouping, &kind)?;
        }
        map.end()
    }
}

/// Borrowed mask -> grouping view of a [`CoveringPlan`].
#[derive(Debug, Clone, Copy)]
pub struct DetailedPlan<'a>(&'a CoveringPlan);

impl fmt::Display for DetailedPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (mask, grouping)) in self.0.assignments().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} => {}", mask, grouping)?;
        }
        Ok(())
    }
}

impl Serialize for DetailedPlan<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.assignments.len()))?;
        for (mask, grouping) in self.0.assignments() {
            map.serialize_entry(&mask, grouping)?;
        }
        map.end()
    }
}
