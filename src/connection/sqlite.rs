//! SQLite-backed connection.
//!
//! SQLite has no `WITH ROLLUP`, so it cannot run a full cube query; it does
//! serve the distinct-count queries behind the cartesian estimate, local
//! experiments, and tests.

use std::path::Path;

use rusqlite::types::ValueRef;
use tracing::debug;

use super::error::{ExecutionError, ExecutionResult};
use super::value::{ResultSet, Value};
use super::Connection;

/// A [`Connection`] over a `rusqlite` database.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// Open or create a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> ExecutionResult<Self> {
        let path = path.as_ref();
        let conn = rusqlite::Connection::open(path)
            .map_err(|e| ExecutionError::query(format!("open {}", path.display()), e))?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> ExecutionResult<Self> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| ExecutionError::query("open :memory:", e))?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    pub fn inner(&self) -> &rusqlite::Connection {
        &self.conn
    }
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl Connection for SqliteConnection {
    fn query(&mut self, sql: &str) -> ExecutionResult<ResultSet> {
        debug!(sql_len = sql.len(), "sqlite query");
        let err = |e: rusqlite::Error| ExecutionError::query(sql, e);

        let mut stmt = self.conn.prepare(sql).map_err(err)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([]).map_err(err)?;
        while let Some(row) = cursor.next().map_err(err)? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(Value::from(row.get_ref(idx).map_err(err)?));
            }
            rows.push(values);
        }

        Ok(ResultSet::new(columns, rows))
    }

    fn execute(&mut self, sql: &str) -> ExecutionResult<()> {
        debug!(sql_len = sql.len(), "sqlite execute");
        self.conn
            .execute_batch(sql)
            .map_err(|e| ExecutionError::query(sql, e))
    }

    /// `group_concat` is unbounded in SQLite and `SET SESSION` does not exist.
    fn supports_session_settings(&self) -> bool {
        false
    }
}
