//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Load configuration from a TOML file.
///
/// Semantic problems are not errors here; run [`validate_config`] and log
/// what it reports.
///
/// [`validate_config`]: crate::config::validation::validate_config
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dispatch]\npath_suffix = \".html\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.dispatch.path_suffix, ".html");
        assert_eq!(config.dispatch.default_controller, "main");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = parse_config("[dispatch\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
