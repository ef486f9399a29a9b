//! Configuration module for Cubify.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, DatabaseSettings, LabelSettings, LoggingSettings, SessionSettings, Settings,
    SettingsError, TemplateSettings,
};
