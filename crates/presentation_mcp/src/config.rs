//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `WTTR_MCP__*` environment variables.
//!
//! ```toml
//! [weather]
//! locale = "de"
//! unit = "metric"
//!
//! [weather.retry]
//! max_attempts = 5
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::Path;

use integration_wttr::WttrConfig;
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `WTTR_MCP__WEATHER__UNIT=metric`
pub const ENV_PREFIX: &str = "WTTR_MCP";

/// Config file looked up in the working directory when no path is given
const DEFAULT_FILE: &str = "wttr-mcp";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when neither `RUST_LOG` nor `-v` is given (default: warn)
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub weather: WttrConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// An explicit `path` must exist; without one, `wttr-mcp.{toml,json,...}`
    /// in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_FILE).required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    use integration_wttr::{Locale, UnitSystem};

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::environment().source(Some(map))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.weather.locale, Locale::English);
        assert_eq!(config.weather.unit, UnitSystem::Imperial);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn load_from_file() {
        let file = toml_file(
            r#"
            [weather]
            locale = "de"
            unit = "metric"
            timeout_secs = 10

            [weather.retry]
            max_attempts = 5

            [logging]
            level = "debug"
            format = "json"
            "#,
        );

        let config = AppConfig::load_with_env(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.weather.locale, Locale::German);
        assert_eq!(config.weather.unit, UnitSystem::Metric);
        assert_eq!(config.weather.timeout_secs, 10);
        assert_eq!(config.weather.retry.max_attempts, 5);
        assert_eq!(config.weather.retry.base_delay_ms, 1000);
        assert_eq!(config.weather.base_url, "https://{locale}.wttr.in");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml_file(
            r#"
            [weather]
            unit = "metric"
            "#,
        );

        let config = AppConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("WTTR_MCP__WEATHER__UNIT", "imperial"),
                ("WTTR_MCP__WEATHER__LOCALE", "fr"),
                ("WTTR_MCP__WEATHER__RETRY__MAX_ATTEMPTS", "1"),
            ]),
        )
        .unwrap();
        assert_eq!(config.weather.unit, UnitSystem::Imperial);
        assert_eq!(config.weather.locale, Locale::French);
        assert_eq!(config.weather.retry.max_attempts, 1);
    }

    #[test]
    fn unknown_unit_falls_back_to_metric() {
        let config =
            AppConfig::load_with_env(None, env(&[("WTTR_MCP__WEATHER__UNIT", "kelvin")])).unwrap();
        assert_eq!(config.weather.unit, UnitSystem::Metric);
    }

    #[test]
    fn unknown_locale_is_rejected() {
        let result = AppConfig::load_with_env(None, env(&[("WTTR_MCP__WEATHER__LOCALE", "xx")]));
        assert!(result.is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(AppConfig::load_with_env(Some(&path), env(&[])).is_err());
    }
}
