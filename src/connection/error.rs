//! Execution error types.

use thiserror::Error;

/// Result type for connection operations.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Errors raised while running statements against a database.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// The database rejected a statement.
    #[error("query failed: {message}\nSQL: {sql}")]
    Query { sql: String, message: String },

    /// A session-level setting could not be applied.
    #[error("failed to configure session: {0}")]
    SessionConfig(String),

    /// A value could not be interpreted as expected.
    #[error("unexpected value for column '{column}': {value}")]
    UnexpectedValue { column: String, value: String },

    /// A query that must return a row returned none.
    #[error("query returned no rows: {0}")]
    EmptyResult(String),

    /// A column expected in a result was missing.
    #[error("column '{0}' not found in result")]
    MissingColumn(String),
}

impl ExecutionError {
    pub fn query(sql: impl Into<String>, message: impl ToString) -> Self {
        Self::Query {
            sql: sql.into(),
            message: message.to_string(),
        }
    }
}
