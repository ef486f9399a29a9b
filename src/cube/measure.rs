//! Measure column specifications.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A source column aggregated with a SQL function, e.g. `SUM(Quantity)`.
///
/// The function name is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measure {
    pub column: String,
    pub function: String,
}

impl Measure {
    pub fn new(column: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            function: function.into(),
        }
    }

    pub fn sum(column: impl Into<String>) -> Self {
        Self::new(column, "SUM")
    }

    pub fn group_concat(column: impl Into<String>) -> Self {
        Self::new(column, "GROUP_CONCAT")
    }

    /// Whether the aggregate is subject to MySQL's `group_concat_max_len`.
    pub fn is_group_concat(&self) -> bool {
        self.function.trim().eq_ignore_ascii_case("GROUP_CONCAT")
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.function)
    }
}

/// Parses `column=FUNCTION`. The column may contain spaces; the last `=`
/// separates the function.
impl FromStr for Measure {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, function) = s
            .rsplit_once('=')
            .ok_or_else(|| ValidationError::InvalidMeasure(s.to_string()))?;
        let (column, function) = (column.trim(), function.trim());
        if column.is_empty() || function.is_empty() {
            return Err(ValidationError::InvalidMeasure(s.to_string()));
        }
        Ok(Self::new(column, function))
    }
}
