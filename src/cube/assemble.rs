//! Turns a covering plan into the final cube query.
//!
//! The query has three layers:
//!
//! ```text
//! SELECT maskHash, IFNULL(dim, "TOTAL") ..., measures      <- outer re-aggregation
//! FROM (
//!     SELECT dims|NULL ..., AGG(measure) ...               <- one per grouping,
//!     FROM ((SELECT IFNULL(dim,'(blank)') ... FROM base))     joined with UNION
//!     GROUP BY <grouping order> [WITH ROLLUP]
//!     UNION ...
//! ) base
//! GROUP BY base.dim, ...
//! ```
//!
//! Blank sanitization keeps genuine NULL source values apart from the NULLs
//! ROLLUP emits for subtotals. The outer `GROUP BY` merges rows that more than
//! one grouping produced, e.g. the grand total.

use tracing::debug;

use super::measure::Measure;
use super::options::CubeOptions;
use crate::error::{CubifyResult, ValidationError};
use crate::grouper::{CoveringPlan, GroupingKind};
use crate::mask::Grouping;
use crate::sql::quote::{aliased, group_by_column, quote_backtick, quote_string_double, quote_string_single};
use crate::sql::template::{BLANK_SANITIZED, MAIN_QUERY, SUB_QUERY};
use crate::sql::TemplateProvider;

/// Builds cube SQL from templates. Holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct QueryAssembler<'a> {
    templates: &'a dyn TemplateProvider,
    options: &'a CubeOptions,
}

impl<'a> QueryAssembler<'a> {
    pub fn new(templates: &'a dyn TemplateProvider, options: &'a CubeOptions) -> Self {
        Self { templates, options }
    }

    /// Assemble the full cube query for `plan`.
    ///
    /// `dimensions` are in mask order: position 1 of every mask is
    /// `dimensions[0]`.
    pub fn assemble(
        &self,
        base_query: &str,
        dimensions: &[String],
        measures: &[Measure],
        plan: &CoveringPlan,
    ) -> CubifyResult<String> {
        if dimensions.is_empty() {
            return Err(ValidationError::NoDimensionColumns.into());
        }
        if measures.is_empty() {
            return Err(ValidationError::NoMeasureColumns.into());
        }
        if plan.num_dims() != dimensions.len() {
            return Err(ValidationError::DimensionColumnMismatch {
                grouper: plan.num_dims(),
                columns: dimensions.len(),
            }
            .into());
        }

        let sanitized_columns = self.sanitized_columns(dimensions, measures);
        let measure_columns = join(measures.iter().map(|m| {
            let quoted = quote_backtick(&m.column);
            format!("{}({}) AS {}", m.function, quoted, quoted)
        }));

        let mut sub_queries = Vec::with_capacity(plan.len());
        for (idx, (grouping, kind)) in plan.iter().enumerate() {
            let source = SubQuerySource {
                base_query,
                position: idx + 1,
                sanitized_columns: &sanitized_columns,
            };
            sub_queries.push(self.sub_query(
                &source,
                grouping,
                kind,
                dimensions,
                &measure_columns,
            )?);
        }
        debug!(sub_queries = sub_queries.len(), "assembled sub-queries");
        let sub_query = sub_queries.join(" UNION ");

        let mask_hash = format!(
            "CONCAT({}) as `maskHash`",
            join(
                dimensions
                    .iter()
                    .map(|d| format!("IF({} IS NULL,0,1)", quote_backtick(d)))
            )
        );
        let total = quote_string_double(&self.options.total_label);
        let outer_dimensions = join(dimensions.iter().map(|d| {
            let quoted = quote_backtick(d);
            format!("IFNULL({}, {}) AS {}", quoted, total, quoted)
        }));
        let outer_measures = join(measures.iter().map(|m| aliased(&m.column)));
        let full_grouping = join(
            dimensions
                .iter()
                .map(|d| format!("base.{}", quote_backtick(d))),
        );

        let sql = self.templates.build_query(
            MAIN_QUERY,
            &[
                ("maskHash", mask_hash.as_str()),
                ("dimensions", outer_dimensions.as_str()),
                ("measures", outer_measures.as_str()),
                ("subQuery", sub_query.as_str()),
                ("groupingSequence", full_grouping.as_str()),
            ],
        )?;
        Ok(sql)
    }

    /// Column list for the blank-sanitizing wrapper.
    fn sanitized_columns(&self, dimensions: &[String], measures: &[Measure]) -> String {
        let blank = quote_string_single(&self.options.blank_label);
        let dims = dimensions.iter().map(|d| {
            let quoted = quote_backtick(d);
            format!("IFNULL({},{}) AS {}", quoted, blank, quoted)
        });
        let measures = measures.iter().map(|m| aliased(&m.column));
        join(dims.chain(measures))
    }

    /// The base query wrapped so that NULL dimension values become the blank
    /// label.
    fn sanitized_source(&self, source: &SubQuerySource<'_>) -> CubifyResult<String> {
        let wrapped = format!("({}) baseQuery{} ", source.base_query, source.position);
        let sanitized = self.templates.build_query(
            BLANK_SANITIZED,
            &[
                ("columns", source.sanitized_columns),
                ("baseQuery", wrapped.as_str()),
            ],
        )?;
        Ok(format!("({}) baseQuery0{} ", sanitized, source.position))
    }

    fn sub_query(
        &self,
        source: &SubQuerySource<'_>,
        grouping: &Grouping,
        kind: GroupingKind,
        dimensions: &[String],
        measure_columns: &str,
    ) -> CubifyResult<String> {
        let mismatch = || ValidationError::DimensionColumnMismatch {
            grouper: grouping.positions().iter().copied().max().unwrap_or(0),
            columns: dimensions.len(),
        };

        let dimension_columns = join(dimensions.iter().enumerate().map(|(idx, d)| {
            if grouping.contains(idx + 1) {
                aliased(d)
            } else {
                format!("NULL as {}", quote_backtick(d))
            }
        }));

        let sequence = grouping
            .positions()
            .iter()
            .map(|&pos| {
                pos.checked_sub(1)
                    .and_then(|i| dimensions.get(i))
                    .map(|d| group_by_column(d))
                    .ok_or_else(mismatch)
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(",");

        let with_rollup = if kind.is_rollup() { " WITH ROLLUP " } else { "" };
        let from = self.sanitized_source(source)?;

        let sql = self.templates.build_query(
            SUB_QUERY,
            &[
                ("dimensions", dimension_columns.as_str()),
                ("measures", measure_columns),
                ("baseQuery", from.as_str()),
                ("groupingSequence", sequence.as_str()),
                ("withRollup", with_rollup),
            ],
        )?;
        Ok(sql)
    }
}

/// Where one sub-query reads from. `position` numbers the derived-table
/// aliases so every sub-query's aliases are unique.
struct SubQuerySource<'a> {
    base_query: &'a str,
    position: usize,
    sanitized_columns: &'a str,
}

fn join<I: Iterator<Item = String>>(parts: I) -> String {
    parts.collect::<Vec<_>>().join(",")
}
