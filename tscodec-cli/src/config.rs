//! `tscodec.toml` loading.
//!
//! Every section is optional; a missing file means defaults everywhere.
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [validate]
//! ignore = ["placeholder_mismatch"]
//! deny_warnings = true
//!
//! [update]
//! no_obsolete = false
//! locations = "relative"
//! ```

use std::path::Path;

use serde::Deserialize;
use tscodec::{ExtractOptions, TranslatorOptions, UpdateOptions, ValidateOptions};

pub const DEFAULT_CONFIG_FILE: &str = "tscodec.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub validate: ValidateOptions,
    pub translator: TranslatorOptions,
    pub update: UpdateOptions,
    pub extract: ExtractOptions,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive such as `warn` or `tscodec=debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Loads `path` when given, otherwise `./tscodec.toml` if it exists.
    ///
    /// An explicitly requested file must exist.
    pub fn load(path: Option<&str>) -> Result<Self, String> {
        let (path, explicit) = match path {
            Some(p) => (Path::new(p), true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };
        if !path.exists() {
            if explicit {
                return Err(format!("Config file does not exist: {}", path.display()));
            }
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tscodec::{LocationStyle, validate::IssueKind};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log.level, "warn");
        assert!(config.validate.check_placeholders);
        assert!(config.update.same_text_heuristic);
        assert_eq!(config.extract.default_context, "QObject");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [log]
            level = "debug"

            [validate]
            ignore = ["placeholder_mismatch"]

            [update]
            locations = "absolute"
            "#,
        )
        .unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.validate.ignore, vec![IssueKind::PlaceholderMismatch]);
        assert!(config.validate.check_placeholders);
        assert_eq!(config.update.locations, LocationStyle::Absolute);
        assert!(config.update.same_text_heuristic);
        assert!(!config.translator.include_unfinished);
    }

    #[test]
    fn test_unknown_issue_kind_is_rejected() {
        let err = Config::from_toml("[validate]\nignore = [\"spelling\"]\n").unwrap_err();
        assert!(err.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(missing.to_str().unwrap())).is_err());
    }
}
