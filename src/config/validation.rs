//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic checks that serde cannot express
//! - Report every problem, not just the first
//!
//! # Design Decisions
//! - No option is fatal: issues are reported as warnings and the dispatcher
//!   keeps running with the values it was given
//! - Validation is a pure function: &AppConfig → Vec<ValidationIssue>

use std::fmt;

use crate::config::schema::AppConfig;

/// A semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending option.
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn issue(field: &str, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue {
        field: field.to_string(),
        message: message.into(),
    }
}

fn is_segment(name: &str) -> bool {
    !name.is_empty() && !name.contains('/')
}

/// Check the configuration for options that will not behave as intended.
pub fn validate_config(config: &AppConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let dispatch = &config.dispatch;

    if !is_segment(&dispatch.default_controller) {
        issues.push(issue(
            "dispatch.default_controller",
            "must be a single non-empty path segment",
        ));
    }
    if !is_segment(&dispatch.default_action) {
        issues.push(issue(
            "dispatch.default_action",
            "must be a single non-empty path segment",
        ));
    }
    if dispatch.path_suffix.contains('/') {
        issues.push(issue("dispatch.path_suffix", "must not contain '/'"));
    }

    let i18n = &config.i18n;
    if i18n.enabled {
        if i18n.supported_languages.is_empty() {
            issues.push(issue(
                "i18n.supported_languages",
                "i18n is enabled but no language is supported",
            ));
        }
        if !i18n.supports(&i18n.default_language) {
            issues.push(issue(
                "i18n.default_language",
                format!(
                    "'{}' is not in supported_languages",
                    i18n.default_language
                ),
            ));
        }
        for code in &i18n.supported_languages {
            if !is_segment(code) {
                issues.push(issue(
                    "i18n.supported_languages",
                    format!("'{}' is not a single path segment", code),
                ));
            }
        }
        if i18n.cookie_name.is_empty() {
            issues.push(issue("i18n.cookie_name", "must not be empty"));
        }
    }

    for (i, delegate) in config.delegates.iter().enumerate() {
        if !delegate.path.starts_with('/') {
            issues.push(issue(
                &format!("delegates[{}].path", i),
                "must start with '/'",
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        issues.push(issue("timeouts.request_secs", "must be greater than 0"));
    }

    issues
}
