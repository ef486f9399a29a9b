//! Assembly options.

use crate::config::Settings;

/// Sentinel labels and session settings used when building and running a
/// cube query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeOptions {
    /// Replaces NULLs found in source dimension columns, so they are not
    /// mistaken for ROLLUP subtotal rows.
    pub blank_label: String,

    /// Replaces NULLs introduced by ROLLUP in the final output.
    pub total_label: String,

    /// Applied as `group_concat_max_len` before running a query whose
    /// measures use `GROUP_CONCAT`. `None` leaves the session untouched.
    pub group_concat_max_len: Option<u64>,
}

impl Default for CubeOptions {
    fn default() -> Self {
        Self {
            blank_label: "(blank)".to_string(),
            total_label: "TOTAL".to_string(),
            group_concat_max_len: Some(u64::MAX),
        }
    }
}

impl CubeOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            blank_label: settings.labels.blank.clone(),
            total_label: settings.labels.total.clone(),
            group_concat_max_len: settings.session.group_concat_max_len,
        }
    }

    pub fn with_blank_label(mut self, label: impl Into<String>) -> Self {
        self.blank_label = label.into();
        self
    }

    pub fn with_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = label.into();
        self
    }

    pub fn with_group_concat_max_len(mut self, len: Option<u64>) -> Self {
        self.group_concat_max_len = len;
        self
    }
}
