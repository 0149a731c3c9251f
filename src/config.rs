//! Configuration file parser for ~/.config/newsdeck/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::news::DEFAULT_LANGUAGE;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the news API, including the `/api` prefix.
    pub api_base_url: String,

    /// Per-request timeout for the news API, in seconds.
    pub request_timeout_secs: u64,

    /// Language used until the user picks one.
    pub default_language: String,

    /// Settings for `newsdeck --serve`.
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 10,
            default_language: DEFAULT_LANGUAGE.to_string(),
            server: ServerConfig::default(),
        }
    }
}

/// `[server]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// JSON array of localized records; the built-in catalog when unset.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 3000,
            catalog_path: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = [
        "api_base_url",
        "request_timeout_secs",
        "default_language",
        "server",
    ];
    const KNOWN_SERVER_KEYS: [&'static str; 3] = ["address", "port", "catalog_path"];

    /// Request timeout, never shorter than one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw);
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            api = %config.api_base_url,
            language = %config.default_language,
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn warn_unknown_keys(raw: &toml::Table) {
    for key in raw.keys() {
        if !Config::KNOWN_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, "Unknown key in config file, ignoring");
        }
    }
    if let Some(server) = raw.get("server").and_then(toml::Value::as_table) {
        for key in server.keys() {
            if !Config::KNOWN_SERVER_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %format!("server.{key}"), "Unknown key in config file, ignoring");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("newsdeck_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.default_language, "en");
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.catalog_path.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsdeck_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.default_language, "en");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let path = write_config("empty", "  \n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_partial_config() {
        let path = write_config(
            "partial",
            r#"
default_language = "te"
request_timeout_secs = 0

[server]
port = 8080
catalog_path = "/srv/news.json"
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.default_language, "te");
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.address, "127.0.0.1");
        assert_eq!(
            config.server.catalog_path.as_deref(),
            Some(Path::new("/srv/news.json"))
        );
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config("unknown", "theme = \"dark\"\n[server]\nbind = \"0.0.0.0\"\n");
        assert!(Config::load(&path).is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let path = write_config("invalid", "port = [unclosed");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_wrong_type() {
        let path = write_config("wrong_type", "request_timeout_secs = \"ten\"");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_too_large() {
        let path = write_config("too_large", &"#".repeat(1_048_577));
        assert!(matches!(Config::load(&path), Err(ConfigError::TooLarge(_))));
    }
}
