//! TOML-based configuration for Cubify.
//!
//! Supports a config file (cubify.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [templates]
//! dir = "${HOME}/cubify/sql"   # omit to use the built-in templates
//! prefix = "mysql_"
//!
//! [labels]
//! blank = "(blank)"
//! total = "TOTAL"
//!
//! [session]
//! group_concat_max_len = "18446744073709551615"   # or "off"
//!
//! [database]
//! path = "./data/sales.sqlite"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cube::CubeOptions;
use crate::sql::template::DEFAULT_PREFIX;
use crate::sql::{BuiltinTemplates, FileTemplates, TemplateProvider};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Where SQL templates come from.
    pub templates: TemplateSettings,

    /// Sentinel labels written into cube output.
    pub labels: LabelSettings,

    /// Session settings applied before running a cube query.
    pub session: SessionSettings,

    /// SQLite database used by the CLI.
    pub database: DatabaseSettings,

    /// Log verbosity.
    pub logging: LoggingSettings,
}

/// Template source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory of `.sql` templates (supports ${ENV_VAR} expansion).
    /// `None` uses the templates compiled into the binary.
    pub dir: Option<String>,

    /// File-name prefix selecting the SQL flavour.
    pub prefix: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Output labels.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Stands in for NULLs present in the source data.
    pub blank: String,

    /// Marks subtotal and grand-total rows.
    pub total: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            blank: "(blank)".to_string(),
            total: "TOTAL".to_string(),
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Value for `group_concat_max_len`. TOML integers stop at `i64::MAX`,
    /// so larger values are written as strings. `"off"` disables the
    /// statement.
    #[serde(
        deserialize_with = "deserialize_max_len",
        serialize_with = "serialize_max_len"
    )]
    pub group_concat_max_len: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            group_concat_max_len: Some(u64::MAX),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file path (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl DatabaseSettings {
    /// Get the database path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `warn` or `cubify=debug`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `CUBIFY_CONFIG`
    /// 2. `./cubify.toml`
    /// 3. `~/.config/cubify/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("CUBIFY_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("cubify.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("cubify").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Template provider for the configured source.
    pub fn template_provider(&self) -> Result<Box<dyn TemplateProvider>, SettingsError> {
        match &self.templates.dir {
            None if self.templates.prefix == DEFAULT_PREFIX => Ok(Box::new(BuiltinTemplates)),
            None => Err(SettingsError::InvalidConfig(format!(
                "templates.prefix '{}' requires templates.dir",
                self.templates.prefix
            ))),
            Some(dir) => {
                let dir = expand_env_vars(dir)?;
                Ok(Box::new(
                    FileTemplates::new(dir).with_prefix(self.templates.prefix.clone()),
                ))
            }
        }
    }

    pub fn cube_options(&self) -> CubeOptions {
        CubeOptions::from_settings(self)
    }
}

fn deserialize_max_len<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Text(String),
    }

    match Raw::deserialize(d)? {
        Raw::Int(n) => Ok(Some(n)),
        Raw::Text(s) if s.trim().eq_ignore_ascii_case("off") => Ok(None),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid group_concat_max_len '{s}'"))),
    }
}

fn serialize_max_len<S: Serializer>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(n) => s.serialize_str(&n.to_string()),
        None => s.serialize_str("off"),
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let lookup = |name: String| env::var(&name).map_err(|_| SettingsError::MissingEnvVar(name));

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        if chars.next_if_eq(&'{').is_some() {
            let mut var_name = String::new();
            while let Some(ch) = chars.next_if(|&ch| ch != '}') {
                var_name.push(ch);
            }
            if chars.next_if_eq(&'}').is_none() {
                return Err(SettingsError::InvalidConfig(format!(
                    "unterminated variable in '{s}'"
                )));
            }
            result.push_str(&lookup(var_name)?);
        } else {
            let mut var_name = String::new();
            while let Some(ch) = chars.next_if(|&ch| ch.is_alphanumeric() || ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
            } else {
                result.push_str(&lookup(var_name)?);
            }
        }
    }

    Ok(result)
}
