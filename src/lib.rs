//! # Cubify
//!
//! Multi-dimensional CUBE aggregation for SQL engines that only support
//! single-axis `GROUP BY ... WITH ROLLUP`.
//!
//! ## Architecture
//!
//! Callers name the dimension combinations ("masks") they need. Cubify covers
//! them with as few ROLLUP and flat `GROUP BY` passes as a greedy search finds
//! and unions the passes into one query:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          Requested masks ("110", "011", ... | all)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [grouper]
//! ┌─────────────────────────────────────────────────────────┐
//! │     CoveringPlan (column order -> flat | rollup)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [assembler + sql templates]
//! ┌─────────────────────────────────────────────────────────┐
//! │     SQL: sanitized sub-queries, UNION, mask hash         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [connection]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  ResultSet / rows                        │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod connection;
pub mod cube;
pub mod error;
pub mod grouper;
pub mod mask;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::connection::{Connection, ResultSet, Row, SqliteConnection, Value};
    pub use crate::cube::{Cube, CubeOptions, Measure, QueryAssembler};
    pub use crate::error::{CubifyError, CubifyResult, ValidationError};
    pub use crate::grouper::{BaseGrouper, CoveringPlan, Grouper, GroupingKind, MaskSelection};
    pub use crate::mask::{Grouping, Mask};
    pub use crate::sql::{BuiltinTemplates, FileTemplates, TemplateProvider};
}

// Also export at crate root for convenience
pub use cube::{Cube, Measure};
pub use error::{CubifyError, CubifyResult};
pub use grouper::{BaseGrouper, Grouper, MaskSelection};
pub use mask::Mask;
