//! Named SQL fragment templates.
//!
//! Templates are plain SQL with `:name` placeholders:
//!
//! ```text
//! SELECT COUNT(DISTINCT :column) AS dimCount FROM (:baseQuery) base
//! ```
//!
//! [`TemplateProvider::build_query`] substitutes each placeholder with its
//! value verbatim. No escaping happens at this layer; callers build safe
//! values. Substitution is a single pass over the template text, so a value
//! that itself contains `:name` is never expanded again.
//!
//! Two providers exist:
//!
//! - [`BuiltinTemplates`] - the MySQL fragments shipped in `resources/sql`
//! - [`FileTemplates`] - `<prefix><name>.sql` files read from a directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Outer aggregation over the unioned sub-queries.
pub const MAIN_QUERY: &str = "main_query";
/// One `GROUP BY` pass for a single grouping.
pub const SUB_QUERY: &str = "sub_query";
/// Replaces source NULLs in dimension columns with a sentinel.
pub const BLANK_SANITIZED: &str = "blank_sanitized";
/// Distinct value count of one dimension.
pub const DIMENSION_COUNT: &str = "dimension_count";
/// Lifts the length limit on concatenating aggregates.
pub const SESSION_GROUP_CONCAT: &str = "session_group_concat";

/// Default file prefix, selecting the MySQL flavour of every fragment.
pub const DEFAULT_PREFIX: &str = "mysql_";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("valid placeholder regex"));

/// Errors raised while loading a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("SQL template '{0}' not found")]
    NotFound(String),

    #[error("SQL template '{0}' is empty")]
    Empty(String),

    #[error("Can not read SQL template file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Source of named SQL fragments.
pub trait TemplateProvider: std::fmt::Debug {
    /// Template text for `name`, trimmed of surrounding whitespace and `;`.
    ///
    /// Fails when the template is missing or empty.
    fn template(&self, name: &str) -> Result<String, TemplateError>;

    /// Load `name` and substitute every `:var` placeholder found in `vars`.
    ///
    /// Placeholders without a matching entry are left untouched.
    fn build_query(&self, name: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
        let template = self.template(name)?;
        Ok(substitute(&template, vars))
    }
}

impl<T: TemplateProvider + ?Sized> TemplateProvider for Box<T> {
    fn template(&self, name: &str) -> Result<String, TemplateError> {
        (**self).template(name)
    }
}

impl<T: TemplateProvider + ?Sized> TemplateProvider for &T {
    fn template(&self, name: &str) -> Result<String, TemplateError> {
        (**self).template(name)
    }
}

/// Replace `:name` placeholders in one pass.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            vars.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn normalize(name: &str, raw: &str) -> Result<String, TemplateError> {
    let text = raw.trim().trim_matches(';');
    if text.is_empty() {
        return Err(TemplateError::Empty(name.to_string()));
    }
    Ok(text.to_string())
}

/// The MySQL fragments compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    fn raw(name: &str) -> Option<&'static str> {
        let text = match name {
            MAIN_QUERY => include_str!("../../resources/sql/mysql_main_query.sql"),
            SUB_QUERY => include_str!("../../resources/sql/mysql_sub_query.sql"),
            BLANK_SANITIZED => include_str!("../../resources/sql/mysql_blank_sanitized.sql"),
            DIMENSION_COUNT => include_str!("../../resources/sql/mysql_dimension_count.sql"),
            SESSION_GROUP_CONCAT => {
                include_str!("../../resources/sql/mysql_session_group_concat.sql")
            }
            _ => return None,
        };
        Some(text)
    }
}

impl TemplateProvider for BuiltinTemplates {
    fn template(&self, name: &str) -> Result<String, TemplateError> {
        let raw = Self::raw(name).ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        normalize(name, raw)
    }
}

/// Templates read from `<dir>/<prefix><name>.sql`.
///
/// Files are read on every lookup.
#[derive(Debug, Clone)]
pub struct FileTemplates {
    dir: PathBuf,
    prefix: String,
}

impl FileTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Use a different flavour prefix (e.g. `"mariadb_"`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let file = if name.ends_with(".sql") {
            format!("{}{}", self.prefix, name)
        } else {
            format!("{}{}.sql", self.prefix, name)
        };
        self.dir.join(file)
    }
}

impl TemplateProvider for FileTemplates {
    fn template(&self, name: &str) -> Result<String, TemplateError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(TemplateError::NotFound(path.display().to_string()));
        }
        let raw = fs::read_to_string(&path).map_err(|source| TemplateError::Read {
            path: path.clone(),
            source,
        })?;
        normalize(&path.display().to_string(), &raw)
    }
}
