//! Caller-facing description of which masks a cube must produce.

use std::convert::Infallible;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::mask::{all_masks, Mask, MAX_DIMENSIONS};

/// Upper bound on dimensions for [`MaskSelection::All`]; the power set is
/// materialized, so it has to stay small.
pub const MAX_ALL_DIMENSIONS: usize = 20;

/// The set of masks requested from a cube.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSelection {
    /// Every combination of the dimensions (the full CUBE).
    All,
    /// Explicit bit strings such as `"110"`, each exactly one character per
    /// dimension.
    Explicit(Vec<String>),
}

impl MaskSelection {
    pub fn explicit<I, S>(masks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(masks.into_iter().map(Into::into).collect())
    }

    /// Width of the first explicit mask, if any.
    pub fn inferred_dimensions(&self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Explicit(masks) => masks.first().map(|m| m.len()),
        }
    }

    /// Validate the selection against `num_dims` and return the requested
    /// masks, deduplicated, in input order.
    ///
    /// The all-ones mask is not added here; that is the grouper's concern.
    pub fn resolve(&self, num_dims: usize) -> Result<Vec<Mask>, ValidationError> {
        if num_dims == 0 || num_dims > MAX_DIMENSIONS {
            return Err(ValidationError::InvalidDimensionCount {
                got: num_dims,
                max: MAX_DIMENSIONS,
            });
        }

        match self {
            Self::All => {
                if num_dims > MAX_ALL_DIMENSIONS {
                    return Err(ValidationError::TooManyDimensionsForAll {
                        got: num_dims,
                        max: MAX_ALL_DIMENSIONS,
                    });
                }
                Ok(all_masks(num_dims))
            }
            Self::Explicit(raw) => {
                if raw.is_empty() {
                    return Err(ValidationError::NoMasks);
                }

                let mut masks: Vec<Mask> = Vec::with_capacity(raw.len());
                for s in raw {
                    let mask = Mask::parse(s)?;
                    if mask.width() != num_dims {
                        return Err(ValidationError::MaskLength {
                            mask: s.clone(),
                            got: mask.width(),
                            expected: num_dims,
                        });
                    }
                    if !masks.contains(&mask) {
                        masks.push(mask);
                    }
                }
                Ok(masks)
            }
        }
    }
}

/// `"all"` selects every mask; anything else is a comma-separated list.
impl FromStr for MaskSelection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Ok(Self::explicit(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty()),
        ))
    }
}

impl From<Vec<String>> for MaskSelection {
    fn from(masks: Vec<String>) -> Self {
        Self::Explicit(masks)
    }
}

impl From<&[&str]> for MaskSelection {
    fn from(masks: &[&str]) -> Self {
        Self::explicit(masks.iter().copied())
    }
}
