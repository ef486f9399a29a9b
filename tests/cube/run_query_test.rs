//! Tests for running cube queries through a recording connection.

use cubify::connection::{Connection, ExecutionError, ExecutionResult, ResultSet, Value};
use cubify::cube::{Cube, CubeOptions, Measure};
use cubify::grouper::MaskSelection;
use cubify::CubifyError;

/// Records every statement and answers queries with a canned result.
#[derive(Debug, Default)]
struct Recording {
    statements: Vec<String>,
    executed: Vec<String>,
    session_settings: bool,
    fail_execute: bool,
    answer: ResultSet,
}

impl Recording {
    fn mysql() -> Self {
        Self {
            session_settings: true,
            answer: ResultSet::new(
                vec!["maskHash".into(), "Region".into(), "Quantity".into()],
                vec![
                    vec!["1".into(), "North".into(), Value::Integer(7)],
                    vec!["0".into(), "TOTAL".into(), Value::Integer(7)],
                ],
            ),
            ..Self::default()
        }
    }
}

impl Connection for Recording {
    fn query(&mut self, sql: &str) -> ExecutionResult<ResultSet> {
        self.statements.push(sql.to_string());
        Ok(self.answer.clone())
    }

    fn execute(&mut self, sql: &str) -> ExecutionResult<()> {
        self.executed.push(sql.to_string());
        if self.fail_execute {
            return Err(ExecutionError::query(sql, "Access denied"));
        }
        Ok(())
    }

    fn supports_session_settings(&self) -> bool {
        self.session_settings
    }
}

fn cube(connection: Recording, measure: Measure) -> Cube<Recording> {
    Cube::new(
        connection,
        "SELECT region AS Region, qty AS Quantity FROM sales",
        MaskSelection::All,
        vec!["Region".into()],
        vec![measure],
    )
    .unwrap()
}

// ============================================================================
// Session Configuration
// ============================================================================

#[test]
fn test_group_concat_sets_session_length_first() {
    let mut cube = cube(Recording::mysql(), Measure::group_concat("Quantity"));
    cube.run_query().unwrap();

    let conn = cube.connection();
    assert_eq!(
        conn.executed,
        vec!["SET SESSION group_concat_max_len = 18446744073709551615".to_string()]
    );
    assert_eq!(conn.statements.len(), 1);
    assert!(conn.statements[0].contains("GROUP_CONCAT(`Quantity`)"));
}

#[test]
fn test_sum_skips_session_setting() {
    let mut cube = cube(Recording::mysql(), Measure::sum("Quantity"));
    cube.run_query().unwrap();
    assert!(cube.connection().executed.is_empty());
}

#[test]
fn test_backend_without_session_settings() {
    let conn = Recording {
        session_settings: false,
        ..Recording::mysql()
    };
    let mut cube = cube(conn, Measure::group_concat("Quantity"));
    cube.run_query().unwrap();
    assert!(cube.connection().executed.is_empty());
}

#[test]
fn test_disabled_session_setting() {
    let mut cube = cube(Recording::mysql(), Measure::group_concat("Quantity"))
        .with_options(CubeOptions::default().with_group_concat_max_len(None));
    cube.run_query().unwrap();
    assert!(cube.connection().executed.is_empty());
}

#[test]
fn test_session_failure_aborts_the_run() {
    let conn = Recording {
        fail_execute: true,
        ..Recording::mysql()
    };
    let mut cube = cube(conn, Measure::group_concat("Quantity"));

    let err = cube.run_query().unwrap_err();
    assert!(matches!(
        err,
        CubifyError::Execution(ExecutionError::SessionConfig(_))
    ));
    assert!(cube.connection().statements.is_empty());
}

// ============================================================================
// Results
// ============================================================================

#[test]
fn test_result_runs_lazily_once() {
    let mut cube = cube(Recording::mysql(), Measure::sum("Quantity"));
    assert_eq!(cube.result().unwrap().len(), 2);
    assert_eq!(cube.result().unwrap().len(), 2);
    assert_eq!(cube.connection().statements.len(), 1);
}

#[test]
fn test_run_query_replaces_the_result() {
    let mut cube = cube(Recording::mysql(), Measure::sum("Quantity"));
    cube.run_query().unwrap().run_query().unwrap();
    assert_eq!(cube.connection().statements.len(), 2);
}

#[test]
fn test_result_dataset_rows() {
    let mut cube = cube(Recording::mysql(), Measure::sum("Quantity"));
    let rows = cube.result_dataset().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("Region"), Some(&Value::from("North")));
    assert_eq!(rows[1].get("maskHash"), Some(&Value::from("0")));
    assert_eq!(
        serde_json::to_string(&rows[1]).unwrap(),
        r#"{"maskHash":"0","Region":"TOTAL","Quantity":7}"#
    );
}

// ============================================================================
// Cartesian Count
// ============================================================================

#[test]
fn test_non_numeric_distinct_count() {
    let conn = Recording {
        answer: ResultSet::new(vec!["dimCount".into()], vec![vec!["many".into()]]),
        ..Recording::mysql()
    };
    let mut cube = cube(conn, Measure::sum("Quantity"));

    let err = cube.cartesian_count().unwrap_err();
    assert!(matches!(
        err,
        CubifyError::Execution(ExecutionError::UnexpectedValue { .. })
    ));
}

#[test]
fn test_distinct_count_query_text() {
    let conn = Recording {
        answer: ResultSet::new(vec!["dimCount".into()], vec![vec![Value::Integer(4)]]),
        ..Recording::mysql()
    };
    let mut cube = cube(conn, Measure::sum("Quantity"));

    // masks "1" and "0": 4 + 1
    assert_eq!(cube.cartesian_count().unwrap(), 5);
    assert_eq!(
        cube.connection().statements,
        vec![
            "SELECT COUNT(DISTINCT `Region`) AS dimCount FROM (SELECT region AS Region, qty AS Quantity FROM sales) base"
                .to_string()
        ]
    );
}
