//! Configuration management for SIGO.
//!
//! Loads configuration from ${SIGO_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `[api] base_url`.
pub const BASE_URL_ENV: &str = "SIGO_BASE_URL";

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for SIGO configuration and data directories.
    //!
    //! SIGO_HOME resolution order:
    //! 1. SIGO_HOME environment variable (if set)
    //! 2. ~/.config/sigo (default)
    //! 3. ./.sigo when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the SIGO home directory.
    pub fn sigo_home() -> PathBuf {
        if let Ok(home) = std::env::var("SIGO_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".sigo"),
            |h| h.join(".config").join("sigo"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        sigo_home().join("config.toml")
    }

    /// Returns the path to the stored session.
    pub fn session_path() -> PathBuf {
        sigo_home().join("session.json")
    }

    /// Returns the directory for rotated log files.
    pub fn logs_dir() -> PathBuf {
        sigo_home().join("logs")
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the portal backend
    pub base_url: String,
    /// Request timeout in seconds (0 disables)
    pub timeout_secs: u64,
}

impl ApiConfig {
    const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Returns the request timeout, or None when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Resolves the base URL with precedence: `SIGO_BASE_URL` > config.
    ///
    /// # Errors
    /// Returns an error if the resolved URL does not parse.
    pub fn effective_base_url(&self) -> Result<String> {
        resolve_base_url(std::env::var(BASE_URL_ENV).ok().as_deref(), &self.base_url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive; `SIGO_LOG` wins when set
    pub level: Option<String>,
    /// Write a daily-rotated log file under ${SIGO_HOME}/logs
    pub file: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default template to `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

/// Picks the first non-blank of `env_value` and `config_value`, validating it.
fn resolve_base_url(env_value: Option<&str>, config_value: &str) -> Result<String> {
    let chosen = env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| config_value.trim());

    if chosen.is_empty() {
        anyhow::bail!("No backend URL configured. Set {BASE_URL_ENV} or [api] base_url.");
    }

    url::Url::parse(chosen).with_context(|| format!("Invalid backend base URL: {chosen}"))?;
    Ok(chosen.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    /// Config loading: missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(30)));
        assert!(!config.log.file);
    }

    /// Config loading: partial config merges with defaults.
    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[api]\nbase_url = \"https://portal.example\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api.base_url, "https://portal.example");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.log.level, None);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[api\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    /// The embedded template parses to the defaults.
    #[test]
    fn test_template_matches_defaults() {
        let config: Config = toml::from_str(default_config_template()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.api.base_url, defaults.api.base_url);
        assert_eq!(config.api.timeout_secs, defaults.api.timeout_secs);
        assert_eq!(config.log.file, defaults.log.file);
    }

    #[test]
    fn test_init_creates_file_and_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("base_url ="));
        assert!(contents.contains("# level ="));

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_timeout_zero_disables() {
        let api = ApiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(api.timeout(), None);
    }

    #[test]
    fn test_base_url_env_wins_over_config() {
        let url = resolve_base_url(Some(" https://env.example/api/ "), "https://cfg.example").unwrap();
        assert_eq!(url, "https://env.example/api");
    }

    #[test]
    fn test_base_url_blank_env_falls_back_to_config() {
        let url = resolve_base_url(Some("  "), "https://cfg.example").unwrap();
        assert_eq!(url, "https://cfg.example");
    }

    #[test]
    fn test_base_url_invalid_is_rejected() {
        assert!(resolve_base_url(None, "not a url").is_err());
        assert!(resolve_base_url(None, "").is_err());
    }
}
