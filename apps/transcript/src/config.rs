//! # Configuration
//!
//! Optional TOML configuration. Every key has a default, so an absent file
//! and an empty file behave the same.
//!
//! ```toml
//! [grading]
//! decimals = 2
//!
//! [display]
//! empty_placeholder = "No data available"
//!
//! [logging]
//! level = "warn"
//! json = false
//! ```

use crate::error::CliError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use transcript_core::assessment::DEFAULT_DECIMALS;
use transcript_core::decimal::FRACTION_DIGITS;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "transcript.toml";

/// Log levels accepted in `[logging] level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub grading: GradingConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
    /// File the configuration was read from; `None` for the defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// `[grading]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradingConfig {
    /// Decimals in displayed grades (0-4).
    pub decimals: u32,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
        }
    }
}

/// `[display]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Text shown for a section with no data.
    pub empty_placeholder: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            empty_placeholder: "No data available".to_string(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset.
    pub level: String,
    /// Emit newline-delimited JSON log lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, CliError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CliError::Config(e.to_string()))?;
        config.validate()
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `transcript.toml` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let path = match path {
            Some(path) => path,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    fn validate(self) -> Result<Self, CliError> {
        if self.grading.decimals > FRACTION_DIGITS {
            return Err(CliError::Config(format!(
                "grading.decimals must be at most {}, got {}",
                FRACTION_DIGITS, self.grading.decimals
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(CliError::Config(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = AppConfig::from_toml_str("[grading]\ndecimals = 1\n").unwrap();
        assert_eq!(config.grading.decimals, 1);
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn decimals_out_of_range_is_rejected() {
        let result = AppConfig::from_toml_str("[grading]\ndecimals = 7\n");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let result = AppConfig::from_toml_str("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = AppConfig::from_toml_str("[grading]\nprecision = 2\n");
        assert!(result.is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/transcript.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn loaded_file_is_recorded_as_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[grading]\ndecimals = 3\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.grading.decimals, 3);
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(AppConfig::default().source, None);
    }
}
