//! Crate-level error types.
//!
//! Errors fall into three kinds:
//!
//! - [`ValidationError`] - malformed input, raised at construction time
//! - [`TemplateError`] - a SQL fragment could not be loaded
//! - [`ExecutionError`] - the database rejected a statement
//!
//! All three convert into [`CubifyError`] so callers can use `?` across the
//! grouper, assembler and connection seams.

use crate::connection::ExecutionError;
use crate::sql::TemplateError;

/// Result type for cube operations.
pub type CubifyResult<T> = Result<T, CubifyError>;

/// Top-level error for the crate.
#[derive(Debug, thiserror::Error)]
pub enum CubifyError {
    #[error("Invalid definition: {0}")]
    Validation(#[from] ValidationError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),
}

impl CubifyError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}

/// Input that does not describe a valid cube.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no masks provided, unable to determine the number of dimensions")]
    NoMasks,

    #[error("number of dimensions must be between 1 and {max}, got {got}")]
    InvalidDimensionCount { got: usize, max: usize },

    #[error("mask '{mask}' is invalid: {reason}")]
    InvalidMask { mask: String, reason: String },

    #[error("mask '{mask}' has length {got}, expected {expected}")]
    MaskLength {
        mask: String,
        got: usize,
        expected: usize,
    },

    #[error("the number of dimensions must be specified for the 'all' masks option")]
    AllWithoutDimensions,

    #[error("'all' masks are limited to {max} dimensions, got {got}")]
    TooManyDimensionsForAll { got: usize, max: usize },

    #[error("grouper covers {grouper} dimensions but {columns} dimension columns were given")]
    DimensionColumnMismatch { grouper: usize, columns: usize },

    #[error("at least one dimension column is required")]
    NoDimensionColumns,

    #[error("at least one measure column is required")]
    NoMeasureColumns,

    #[error("invalid measure definition '{0}', expected <column>=<FUNCTION>")]
    InvalidMeasure(String),
}

impl ValidationError {
    pub(crate) fn invalid_mask(mask: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMask {
            mask: mask.into(),
            reason: reason.into(),
        }
    }
}
