//! The caller-facing cube.
//!
//! A [`Cube`] ties a connection, a base query, the requested masks and the
//! dimension/measure columns together. It plans the groupings, assembles the
//! SQL, runs it, and keeps the last result.
//!
//! # Example
//!
//! ```no_run
//! use cubify::connection::SqliteConnection;
//! use cubify::cube::{Cube, Measure};
//! use cubify::grouper::MaskSelection;
//!
//! let conn = SqliteConnection::open("sales.db")?;
//! let cube = Cube::new(
//!     conn,
//!     "SELECT region, product, qty FROM sales",
//!     MaskSelection::All,
//!     vec!["region".into(), "product".into()],
//!     vec![Measure::sum("qty")],
//! )?;
//! println!("{}", cube.cube_query()?);
//! # Ok::<(), cubify::CubifyError>(())
//! ```

mod assemble;
mod cartesian;
mod measure;
mod options;

pub use assemble::QueryAssembler;
pub use cartesian::cartesian_count;
pub use measure::Measure;
pub use options::CubeOptions;

use tracing::{debug, info};

use crate::connection::{Connection, ExecutionError, ResultSet, Row};
use crate::error::{CubifyResult, ValidationError};
use crate::grouper::{BaseGrouper, CoveringPlan, Grouper, MaskSelection};
use crate::mask::Mask;
use crate::sql::quote::quote_backtick;
use crate::sql::template::{DIMENSION_COUNT, SESSION_GROUP_CONCAT};
use crate::sql::{BuiltinTemplates, TemplateProvider};

/// A cube over one base query.
pub struct Cube<C: Connection> {
    connection: C,
    base_query: String,
    dimensions: Vec<String>,
    measures: Vec<Measure>,
    /// Masks the caller asked for, without the implicit all-ones mask.
    requested: Vec<Mask>,
    grouper: Box<dyn Grouper>,
    templates: Box<dyn TemplateProvider>,
    options: CubeOptions,
    result: Option<ResultSet>,
}

impl<C: Connection> Cube<C> {
    /// Validate the definition and build a cube with the greedy grouper,
    /// built-in templates and default options.
    ///
    /// The number of dimensions is the number of dimension columns; every
    /// mask must have that many characters.
    pub fn new(
        connection: C,
        base_query: impl Into<String>,
        masks: MaskSelection,
        dimensions: Vec<String>,
        measures: Vec<Measure>,
    ) -> CubifyResult<Self> {
        if dimensions.is_empty() {
            return Err(ValidationError::NoDimensionColumns.into());
        }
        if measures.is_empty() {
            return Err(ValidationError::NoMeasureColumns.into());
        }
        let requested = masks.resolve(dimensions.len())?;
        let grouper = BaseGrouper::from_masks(dimensions.len(), requested.clone());

        Ok(Self {
            connection,
            base_query: base_query.into(),
            dimensions,
            measures,
            requested,
            grouper: Box::new(grouper),
            templates: Box::new(BuiltinTemplates),
            options: CubeOptions::default(),
            result: None,
        })
    }

    /// Replace the grouping strategy. The grouper must span the same number
    /// of dimensions as the cube.
    pub fn set_grouper(&mut self, grouper: Box<dyn Grouper>) -> CubifyResult<&mut Self> {
        if grouper.num_dims() != self.dimensions.len() {
            return Err(ValidationError::DimensionColumnMismatch {
                grouper: grouper.num_dims(),
                columns: self.dimensions.len(),
            }
            .into());
        }
        self.grouper = grouper;
        self.result = None;
        Ok(self)
    }

    pub fn with_templates(mut self, templates: impl TemplateProvider + 'static) -> Self {
        self.templates = Box::new(templates);
        self.result = None;
        self
    }

    pub fn with_options(mut self, options: CubeOptions) -> Self {
        self.options = options;
        self.result = None;
        self
    }

    pub fn base_query(&self) -> &str {
        &self.base_query
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn requested_masks(&self) -> &[Mask] {
        &self.requested
    }

    pub fn grouper(&self) -> &dyn Grouper {
        self.grouper.as_ref()
    }

    pub fn options(&self) -> &CubeOptions {
        &self.options
    }

    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_connection(self) -> C {
        self.connection
    }

    /// The covering plan the cube query is built from.
    pub fn plan(&self) -> CoveringPlan {
        self.grouper.groupings()
    }

    /// Assemble the cube SQL. Planning is redone on every call; the output is
    /// identical for an unchanged cube.
    pub fn cube_query(&self) -> CubifyResult<String> {
        let plan = self.plan();
        QueryAssembler::new(self.templates.as_ref(), &self.options).assemble(
            &self.base_query,
            &self.dimensions,
            &self.measures,
            &plan,
        )
    }

    /// Run the cube query and store its result, replacing any previous one.
    pub fn run_query(&mut self) -> CubifyResult<&mut Self> {
        let sql = self.cube_query()?;
        self.configure_session()?;

        info!(
            dimensions = self.dimensions.len(),
            measures = self.measures.len(),
            "running cube query"
        );
        let result = self.connection.query(&sql)?;
        debug!(rows = result.len(), "cube query returned");
        self.result = Some(result);
        Ok(self)
    }

    /// The stored result, running the query first if there is none.
    pub fn result(&mut self) -> CubifyResult<&ResultSet> {
        if self.result.is_none() {
            self.run_query()?;
        }
        self.result
            .as_ref()
            .ok_or_else(|| ExecutionError::EmptyResult("cube query".to_string()).into())
    }

    /// The result as rows keyed by column name, in result order.
    pub fn result_dataset(&mut self) -> CubifyResult<Vec<Row>> {
        Ok(self.result()?.to_rows())
    }

    /// Upper bound on the rows the cube can return: for each requested mask,
    /// the product of the distinct-value counts of its detailed dimensions.
    ///
    /// Issues one `COUNT(DISTINCT ...)` query per dimension.
    pub fn cartesian_count(&mut self) -> CubifyResult<u64> {
        let mut counts = Vec::with_capacity(self.dimensions.len());
        for dimension in &self.dimensions {
            let column = quote_backtick(dimension);
            let sql = self.templates.build_query(
                DIMENSION_COUNT,
                &[("column", column.as_str()), ("baseQuery", self.base_query.as_str())],
            )?;
            let result = self.connection.query(&sql)?;
            let value = result.first_value("dimCount")?;
            let count = value
                .as_count()
                .ok_or_else(|| ExecutionError::UnexpectedValue {
                    column: dimension.clone(),
                    value: value.to_string(),
                })?;
            debug!(dimension = %dimension, count, "distinct values");
            counts.push(count);
        }

        let total = cartesian_count(&self.requested, &counts);
        info!(masks = self.requested.len(), total, "cartesian count");
        Ok(total)
    }

    /// Raise `group_concat_max_len` when a measure aggregates with
    /// `GROUP_CONCAT` and the backend has session settings.
    fn configure_session(&mut self) -> CubifyResult<()> {
        let Some(max_len) = self.options.group_concat_max_len else {
            return Ok(());
        };
        if !self.measures.iter().any(Measure::is_group_concat)
            || !self.connection.supports_session_settings()
        {
            return Ok(());
        }

        let max_len = max_len.to_string();
        let sql = self
            .templates
            .build_query(SESSION_GROUP_CONCAT, &[("maxLength", max_len.as_str())])?;
        debug!(%sql, "configuring session");
        self.connection
            .execute(&sql)
            .map_err(|e| ExecutionError::SessionConfig(e.to_string()))?;
        Ok(())
    }
}

impl<C: Connection + std::fmt::Debug> std::fmt::Debug for Cube<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cube")
            .field("connection", &self.connection)
            .field("dimensions", &self.dimensions)
            .field("measures", &self.measures)
            .field("grouper", &self.grouper)
            .field("has_result", &self.result.is_some())
            .finish()
    }
}
