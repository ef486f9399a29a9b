//! Identifier and literal quoting for MySQL fragments.

use once_cell::sync::Lazy;
use regex::Regex;

static PLAIN_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Quote identifier with backticks.
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with double quotes (MySQL outside ANSI_QUOTES mode).
pub fn quote_string_double(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `` `col` AS `col` ``
pub fn aliased(ident: &str) -> String {
    let quoted = quote_backtick(ident);
    format!("{} AS {}", quoted, quoted)
}

/// Column reference for a `GROUP BY` list: bare when it is a plain
/// identifier, backtick-quoted otherwise.
pub fn group_by_column(ident: &str) -> String {
    if PLAIN_IDENTIFIER.is_match(ident) {
        ident.to_string()
    } else {
        quote_backtick(ident)
    }
}
