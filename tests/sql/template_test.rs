//! Tests for directory-backed SQL templates.

use std::fs;

use cubify::sql::{BuiltinTemplates, FileTemplates, TemplateError, TemplateProvider};
use tempfile::tempdir;

#[test]
fn test_file_template_is_trimmed() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("mysql_dimension_count.sql"),
        "\n  SELECT COUNT(DISTINCT :column) AS dimCount FROM (:baseQuery) base;\n\n",
    )
    .unwrap();

    let templates = FileTemplates::new(dir.path());
    assert_eq!(
        templates.template("dimension_count").unwrap(),
        "SELECT COUNT(DISTINCT :column) AS dimCount FROM (:baseQuery) base"
    );
}

#[test]
fn test_build_query_substitutes_verbatim() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("pg_literal.sql"),
        "SELECT :value AS v, ':value' AS raw",
    )
    .unwrap();

    let templates = FileTemplates::new(dir.path()).with_prefix("pg_");
    let sql = templates
        .build_query("literal", &[("value", "'it''s'")])
        .unwrap();
    assert_eq!(sql, "SELECT 'it''s' AS v, ''it''s'' AS raw");
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let templates = FileTemplates::new(dir.path());
    match templates.template("main_query") {
        Err(TemplateError::NotFound(path)) => assert!(path.ends_with("mysql_main_query.sql")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_empty_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("mysql_sub_query.sql"), " ;\n").unwrap();

    let templates = FileTemplates::new(dir.path());
    assert!(matches!(
        templates.template("sub_query"),
        Err(TemplateError::Empty(_))
    ));
}

#[test]
fn test_file_templates_can_mirror_builtins() {
    let dir = tempdir().unwrap();
    for name in ["main_query", "sub_query", "blank_sanitized"] {
        let text = BuiltinTemplates.template(name).unwrap();
        fs::write(
            dir.path().join(format!("mysql_{}.sql", name)),
            format!("{};\n", text),
        )
        .unwrap();
    }

    let templates = FileTemplates::new(dir.path());
    for name in ["main_query", "sub_query", "blank_sanitized"] {
        assert_eq!(
            templates.template(name).unwrap(),
            BuiltinTemplates.template(name).unwrap()
        );
    }
}
