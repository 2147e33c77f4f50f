//! Configuration loading from file and environment variables.

use serde::Deserialize;
use thiserror::Error;
use userdao_db::DataSourceConfig;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Connection parameters.
    #[serde(default)]
    pub database: DataSourceConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "userdao_db=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Path used when neither the command line nor the environment names one.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Picks the configuration file path and reports where it came from.
///
/// A non-blank command-line argument wins over a non-blank
/// `USERDAO_CONFIG_PATH` value, which wins over [`DEFAULT_CONFIG_PATH`].
pub fn resolve_config_path(
    cli_arg: Option<String>,
    env_value: Option<String>,
) -> (String, &'static str) {
    if let Some(path) = cli_arg.filter(|value| !value.trim().is_empty()) {
        return (path, "cli-arg");
    }

    if let Some(path) = env_value.filter(|value| !value.trim().is_empty()) {
        return (path, "env-var");
    }

    (DEFAULT_CONFIG_PATH.to_string(), "default")
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `USERDAO_DB_URL` overrides `database.url`
/// - `USERDAO_DB_USER` overrides `database.user`
/// - `USERDAO_DB_PASSWORD` overrides `database.password`
/// - `USERDAO_LOG_LEVEL` overrides `logging.level`
/// - `USERDAO_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => parse_config(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Parses configuration from TOML text.
///
/// # Errors
///
/// Returns `ConfigError::Parse` if the text is not valid configuration.
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Applies overrides looked up through `lookup`.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("USERDAO_DB_URL") {
        config.database.url = url;
    }
    if let Some(user) = lookup("USERDAO_DB_USER") {
        config.database.user = user;
    }
    if let Some(password) = lookup("USERDAO_DB_PASSWORD") {
        config.database.password = password;
    }
    if let Some(level) = lookup("USERDAO_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("USERDAO_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").expect("empty config should parse");
        assert_eq!(config.database.url, "sqlite:users.db");
        assert_eq!(config.database.user, "sa");
        assert_eq!(config.database.password, "");
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn parses_recognized_database_options() {
        let config = parse_config(
            r#"
            [database]
            url = "sqlite:///srv/users.db"
            user = "admin"
            password = "pw"

            [logging]
            level = "debug"
            json = true
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.database.url, "sqlite:///srv/users.db");
        assert_eq!(config.database.user, "admin");
        assert_eq!(config.database.password, "pw");
        assert_eq!(config.database.busy_timeout_ms, 5_000);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = parse_config("[database\nurl = ").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = [
            ("USERDAO_DB_URL", "sqlite:other.db"),
            ("USERDAO_DB_USER", "root"),
            ("USERDAO_DB_PASSWORD", "secret"),
            ("USERDAO_LOG_LEVEL", "warn"),
            ("USERDAO_LOG_JSON", "1"),
        ]
        .into_iter()
        .collect();

        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.url, "sqlite:other.db");
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json);
    }

    #[test]
    fn config_path_prefers_cli_then_env_then_default() {
        assert_eq!(
            resolve_config_path(Some("cli.toml".into()), Some("env.toml".into())),
            ("cli.toml".to_string(), "cli-arg")
        );
        assert_eq!(
            resolve_config_path(Some("  ".into()), Some("env.toml".into())),
            ("env.toml".to_string(), "env-var")
        );
        assert_eq!(
            resolve_config_path(None, Some("".into())),
            (DEFAULT_CONFIG_PATH.to_string(), "default")
        );
        assert_eq!(
            resolve_config_path(None, None),
            ("config.toml".to_string(), "default")
        );
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("absent.toml");
        let config =
            load_config(path.to_str()).expect("missing file should fall back to defaults");
        assert!(!config.database.url.is_empty());
    }
}
