//! Ordered dimension sequences used as a physical `GROUP BY` column order.

use std::fmt;

use serde::{Serialize, Serializer};

use super::Mask;

/// An ordered, non-repeating sequence of 1-based dimension positions.
///
/// Order matters: ROLLUP peels columns from the right, so `[3, 1, 2]` and
/// `[1, 2, 3]` produce different subtotal levels from the same column set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Grouping(Vec<usize>);

impl Grouping {
    pub fn new(positions: Vec<usize>) -> Self {
        debug_assert!(
            {
                let mut sorted = positions.clone();
                sorted.sort_unstable();
                sorted.dedup();
                sorted.len() == positions.len() && !sorted.contains(&0)
            },
            "grouping positions must be distinct and 1-based: {:?}",
            positions
        );
        Self(positions)
    }

    pub fn positions(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The mask with exactly this grouping's dimensions detailed.
    pub fn mask(&self, width: usize) -> Mask {
        Mask::from_positions(width, &self.0)
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.0.contains(&pos)
    }
}

impl From<Vec<usize>> for Grouping {
    fn from(positions: Vec<usize>) -> Self {
        Self::new(positions)
    }
}

/// Renders as concatenated digits (`312`) while every position fits in one
/// digit, and comma-separated (`10,2,1`) otherwise.
impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.0.iter().all(|&pos| pos < 10) {
            ""
        } else {
            ","
        };
        for (i, pos) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            write!(f, "{}", pos)?;
        }
        Ok(())
    }
}

impl Serialize for Grouping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
