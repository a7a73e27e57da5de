//! Startup sequence.
//!
//! Load config → install logging → validate (warnings only) → freeze behind Arc.

use std::path::Path;
use std::sync::Arc;

use crate::config::{load_config, validate_config, AppConfig, ConfigError};

/// Load the configuration named on the command line, or the defaults.
///
/// Only an unreadable or unparsable file that was explicitly named is an
/// error. Semantic issues are left to [`report_config`].
pub fn load_app_config(path: Option<&Path>) -> Result<Arc<AppConfig>, ConfigError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    Ok(Arc::new(config))
}

/// Log where the configuration came from and any validation issues.
///
/// Runs after the subscriber is installed, since the subscriber itself is
/// configured from the loaded file.
pub fn report_config(path: Option<&Path>, config: &AppConfig) -> usize {
    match path {
        Some(path) => tracing::info!(path = %path.display(), "Configuration loaded"),
        None => tracing::info!("No configuration file given, using defaults"),
    }

    let issues = validate_config(config);
    for issue in &issues {
        tracing::warn!(field = %issue.field, "Configuration issue: {}", issue.message);
    }
    issues.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_path() {
        let config = load_app_config(None).unwrap();
        assert_eq!(config.dispatch.default_controller, "main");
    }

    #[test]
    fn test_invalid_values_are_not_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[i18n]\nenabled = true\ndefault_language = \"xx\"").unwrap();
        let config = load_app_config(Some(file.path())).unwrap();
        assert_eq!(config.i18n.default_language, "xx");
        assert!(report_config(Some(file.path()), &config) > 0);
    }

    #[test]
    fn test_named_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_app_config(Some(dir.path().join("absent.toml").as_path())).is_err());
    }
}
