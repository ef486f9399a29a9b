//! Database connection abstraction.
//!
//! The cube never talks to a database directly; it receives a
//! [`Connection`] and issues whole statements through it. Locking, pooling,
//! retries and timeouts are the implementation's business.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   SQL text    ┌──────────────────────┐
//! │     Cube     │ ────────────▶ │  impl Connection     │
//! │              │ ◀──────────── │  (SQLite, test fake) │
//! └──────────────┘   ResultSet   └──────────────────────┘
//! ```

mod error;
mod sqlite;
mod value;

pub use error::{ExecutionError, ExecutionResult};
pub use sqlite::SqliteConnection;
pub use value::{ResultSet, Row, Value};

/// Executes SQL text and returns tabular results.
pub trait Connection {
    /// Run a statement that returns rows.
    fn query(&mut self, sql: &str) -> ExecutionResult<ResultSet>;

    /// Run a statement for its side effects.
    fn execute(&mut self, sql: &str) -> ExecutionResult<()> {
        self.query(sql).map(|_| ())
    }

    /// Whether the backend accepts `SET SESSION` statements.
    fn supports_session_settings(&self) -> bool {
        true
    }
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn query(&mut self, sql: &str) -> ExecutionResult<ResultSet> {
        (**self).query(sql)
    }

    fn execute(&mut self, sql: &str) -> ExecutionResult<()> {
        (**self).execute(sql)
    }

    fn supports_session_settings(&self) -> bool {
        (**self).supports_session_settings()
    }
}

impl<C: Connection + ?Sized> Connection for Box<C> {
    fn query(&mut self, sql: &str) -> ExecutionResult<ResultSet> {
        (**self).query(sql)
    }

    fn execute(&mut self, sql: &str) -> ExecutionResult<()> {
        (**self).execute(sql)
    }

    fn supports_session_settings(&self) -> bool {
        (**self).supports_session_settings()
    }
}
