//! Tests for cube query assembly against recorded SQL.

use cubify::connection::SqliteConnection;
use cubify::cube::{Cube, CubeOptions, Measure};
use cubify::grouper::{BaseGrouper, MaskSelection};
use cubify::sql::{substitute, FileTemplates, TemplateError, TemplateProvider};

const BASE_QUERY: &str = r#"
            SELECT
                d.year_winter_starts as `Year`,
                d.snow_depth         as `Snow depth`,
                bt.name              as `Transect`,
                bs.name              as `Species`,
                d.num_animals        as `Num animals`
            FROM banff_data d
                     LEFT JOIN banff_species bs on d.species_id = bs.id
                     LEFT JOIN banff_transects bt on d.transect_id = bt.id
                     LEFT JOIN banff_transect_intervals bti on d.transect_interval_id = bti.id WHERE d.species_id IS NOT NULL"#;

fn banff_cube() -> Cube<SqliteConnection> {
    Cube::new(
        SqliteConnection::open_in_memory().unwrap(),
        BASE_QUERY,
        MaskSelection::explicit(["111", "110", "101"]),
        vec!["Transect".into(), "Year".into(), "Species".into()],
        vec![
            Measure::group_concat("Snow depth"),
            Measure::group_concat("Num animals"),
        ],
    )
    .unwrap()
}

fn sanitized_source(position: usize) -> String {
    [
        "FROM ((SELECT\n",
        "    IFNULL(`Transect`,'(blank)') AS `Transect`,IFNULL(`Year`,'(blank)') AS `Year`,",
        "IFNULL(`Species`,'(blank)') AS `Species`,`Snow depth` AS `Snow depth`,",
        "`Num animals` AS `Num animals`\n",
        "FROM ((",
        BASE_QUERY,
        format!(") baseQuery{} )) baseQuery0{} )\n", position, position).as_str(),
    ]
    .concat()
}

fn expected_query() -> String {
    [
        "SELECT\n",
        "    CONCAT(IF(`Transect` IS NULL,0,1),IF(`Year` IS NULL,0,1),IF(`Species` IS NULL,0,1)) as `maskHash`,\n",
        "    IFNULL(`Transect`, \"TOTAL\") AS `Transect`,IFNULL(`Year`, \"TOTAL\") AS `Year`,",
        "IFNULL(`Species`, \"TOTAL\") AS `Species`,\n",
        "    `Snow depth` AS `Snow depth`,`Num animals` AS `Num animals`\n",
        "FROM (\n",
        "         SELECT\n",
        "    `Transect` AS `Transect`,`Year` AS `Year`,`Species` AS `Species`,\n",
        "    GROUP_CONCAT(`Snow depth`) AS `Snow depth`,GROUP_CONCAT(`Num animals`) AS `Num animals`\n",
        sanitized_source(1).as_str(),
        "GROUP BY Transect,Year,Species  WITH ROLLUP  UNION SELECT\n",
        "    `Transect` AS `Transect`,NULL as `Year`,`Species` AS `Species`,\n",
        "    GROUP_CONCAT(`Snow depth`) AS `Snow depth`,GROUP_CONCAT(`Num animals`) AS `Num animals`\n",
        sanitized_source(2).as_str(),
        "GROUP BY Transect,Species \n",
        "         ) base\n",
        "GROUP BY base.`Transect`,base.`Year`,base.`Species`",
    ]
    .concat()
}

#[test]
fn test_cube_query_matches_recorded_sql() {
    let sql = banff_cube().cube_query().unwrap();
    assert_eq!(sql, expected_query());
}

#[test]
fn test_cube_query_is_idempotent() {
    let cube = banff_cube();
    let first = cube.cube_query().unwrap();
    assert_eq!(first, cube.cube_query().unwrap());
}

#[test]
fn test_set_grouper_changes_the_plan() {
    let mut cube = banff_cube();
    let before = cube.cube_query().unwrap();

    let grouper = BaseGrouper::new(3, &MaskSelection::explicit(["111"])).unwrap();
    cube.set_grouper(Box::new(grouper)).unwrap();
    let after = cube.cube_query().unwrap();

    assert_ne!(before, after);
    assert!(!after.contains(" UNION "));
    assert!(!after.contains("WITH ROLLUP"));
}

#[test]
fn test_custom_options_reach_the_query() {
    let cube = banff_cube().with_options(CubeOptions::default().with_total_label("ALL"));
    let sql = cube.cube_query().unwrap();
    assert!(sql.contains("IFNULL(`Transect`, \"ALL\") AS `Transect`"));
    assert!(!sql.contains("\"TOTAL\""));
}

/// Serves templates from memory so a test can swap one fragment.
#[derive(Debug)]
struct CompactMain;

impl TemplateProvider for CompactMain {
    fn template(&self, name: &str) -> Result<String, TemplateError> {
        match name {
            "main_query" => Ok("SELECT :maskHash FROM (:subQuery) cube".to_string()),
            other => cubify::sql::BuiltinTemplates.template(other),
        }
    }
}

#[test]
fn test_custom_templates() {
    let cube = banff_cube().with_templates(CompactMain);
    let sql = cube.cube_query().unwrap();
    assert!(sql.starts_with("SELECT CONCAT("));
    assert!(sql.ends_with(") cube"));
}

#[test]
fn test_missing_template_is_a_template_error() {
    let dir = tempfile::tempdir().unwrap();
    let cube = banff_cube().with_templates(FileTemplates::new(dir.path()));
    let err = cube.cube_query().unwrap_err();
    assert!(err.is_template(), "unexpected error: {err}");
}

#[test]
fn test_substitution_does_not_rescan_values() {
    let out = substitute("a :x b :y", &[("x", ":y"), ("y", "Y")]);
    assert_eq!(out, "a :y b Y");
}
