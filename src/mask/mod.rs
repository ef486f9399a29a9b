//! Dimension masks and the combinatorics the grouper is built on.
//!
//! A mask marks, for every dimension, whether the dimension is detailed (`1`)
//! or totalled (`0`) in one category of output rows. The canonical external
//! form is a left-to-right bit string where position 1 is the leftmost
//! character:
//!
//! ```text
//! "101"  ->  dimension 1 detailed, dimension 2 totalled, dimension 3 detailed
//! ```
//!
//! Internally a mask is a `u64` bitset plus its width, so masks of the same
//! width order by numeric value and `"111" > "110" > ... > "000"`.

mod algebra;
mod grouping;

pub use algebra::{all_masks, grouping_from_mask, permutations, rollup_coverage, Permutations};
pub use grouping::Grouping;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Widest mask supported by the bitset representation.
pub const MAX_DIMENSIONS: usize = 64;

/// A fixed-width set of detailed dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mask {
    width: u8,
    bits: u64,
}

impl Mask {
    /// The mask with every dimension totalled (the grand total).
    pub fn zeros(width: usize) -> Self {
        debug_assert!((1..=MAX_DIMENSIONS).contains(&width));
        Self {
            width: width as u8,
            bits: 0,
        }
    }

    /// The mask with every dimension detailed (the top-level, finest grouping).
    pub fn ones(width: usize) -> Self {
        debug_assert!((1..=MAX_DIMENSIONS).contains(&width));
        let bits = if width == MAX_DIMENSIONS {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        Self {
            width: width as u8,
            bits,
        }
    }

    pub(crate) fn from_bits(width: usize, bits: u64) -> Self {
        let mask = Self::ones(width);
        Self {
            width: mask.width,
            bits: bits & mask.bits,
        }
    }

    /// Build a mask with the given 1-based positions set.
    pub fn from_positions(width: usize, positions: &[usize]) -> Self {
        positions
            .iter()
            .fold(Self::zeros(width), |mask, &pos| mask.with(pos))
    }

    /// Parse a canonical bit string such as `"1101"`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::invalid_mask(s, "mask is empty"));
        }
        if !s.chars().all(|c| c == '0' || c == '1') {
            return Err(ValidationError::invalid_mask(
                s,
                "only the characters '0' and '1' are allowed",
            ));
        }
        if s.len() > MAX_DIMENSIONS {
            return Err(ValidationError::invalid_mask(
                s,
                format!("at most {} dimensions are supported", MAX_DIMENSIONS),
            ));
        }

        let bits = s
            .bytes()
            .fold(0u64, |acc, b| (acc << 1) | u64::from(b == b'1'));
        Ok(Self {
            width: s.len() as u8,
            bits,
        })
    }

    /// Number of dimensions this mask spans.
    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of detailed dimensions.
    pub fn count_ones(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Whether the dimension at the 1-based `pos` is detailed.
    pub fn is_set(&self, pos: usize) -> bool {
        pos >= 1 && pos <= self.width() && self.bits & self.bit(pos) != 0
    }

    /// Copy of this mask with the dimension at `pos` detailed.
    pub fn with(self, pos: usize) -> Self {
        debug_assert!(pos >= 1 && pos <= self.width());
        Self {
            bits: self.bits | self.bit(pos),
            ..self
        }
    }

    /// Copy of this mask with the dimension at `pos` totalled.
    pub fn without(self, pos: usize) -> Self {
        debug_assert!(pos >= 1 && pos <= self.width());
        Self {
            bits: self.bits & !self.bit(pos),
            ..self
        }
    }

    /// Ascending 1-based positions of the detailed dimensions.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (1..=self.width()).filter(move |&pos| self.is_set(pos))
    }

    pub fn is_ones(&self) -> bool {
        *self == Self::ones(self.width())
    }

    fn bit(&self, pos: usize) -> u64 {
        1u64 << (self.width() - pos)
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in 1..=self.width() {
            f.write_str(if self.is_set(pos) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Mask {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Mask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
