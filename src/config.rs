//! Configuration Management
//!
//! Handles persistent connection settings for halctl.

use crate::api::auth::{Credentials, DEFAULT_API_VERSION, DEFAULT_AUTH_PATH};
use crate::api::client::{ClientSettings, DEFAULT_TIMEOUT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const ENV_URL: &str = "HALCTL_URL";
pub const ENV_USERNAME: &str = "HALCTL_USERNAME";
pub const ENV_PASSWORD: &str = "HALCTL_PASSWORD";

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_auth_path() -> String {
    DEFAULT_AUTH_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base endpoint, e.g. `https://cmp.example.com:8443`
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Token endpoint path under `/api/{version}/`
    #[serde(default = "default_auth_path")]
    pub auth_path: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            api_version: default_api_version(),
            auth_path: default_auth_path(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("halctl").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a file; missing or unreadable files give defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Apply `HALCTL_*` environment variables on top of the file values
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_URL) {
            self.base_url = Some(url);
        }
        if let Ok(username) = std::env::var(ENV_USERNAME) {
            self.username = Some(username);
        }
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            self.password = Some(password);
        }
        self
    }

    /// Take the password from the first line of `reader`, without its line ending
    pub fn read_password(&mut self, mut reader: impl BufRead) -> Result<()> {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let password = line.trim_end_matches(['\r', '\n']);
        if password.is_empty() {
            anyhow::bail!("Empty password");
        }
        self.password = Some(password.to_string());
        Ok(())
    }

    /// Build client settings, failing on missing connection details
    pub fn client_settings(&self) -> Result<ClientSettings> {
        let base_url = self
            .base_url
            .as_deref()
            .context(format!("No API endpoint configured. Set {} or use --url", ENV_URL))?;
        let base_url = Url::parse(base_url).context("Invalid API endpoint URL")?;

        let username = self
            .username
            .clone()
            .context(format!("No username configured. Set {} or use --username", ENV_USERNAME))?;
        let password = self.password.clone().context(format!(
            "No password configured. Set {} or run 'halctl configure --password-stdin'",
            ENV_PASSWORD
        ))?;

        Ok(ClientSettings {
            base_url,
            api_version: self.api_version.clone(),
            auth_path: self.auth_path.clone(),
            credentials: Credentials::new(username, password),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_version, "v3");
        assert_eq!(config.auth_path, "cmp/apiToken");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"base_url": "https://cmp.local:8443"}"#).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://cmp.local:8443"));
        assert_eq!(config.api_version, "v3");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            base_url: Some("https://cmp.local:8443".into()),
            username: Some("admin".into()),
            timeout_secs: 5,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.base_url, config.base_url);
        assert_eq!(loaded.username.as_deref(), Some("admin"));
        assert_eq!(loaded.timeout_secs, 5);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        let loaded = Config::load_from(&path);
        assert!(loaded.base_url.is_none());
    }

    #[test]
    fn test_client_settings_requires_endpoint() {
        let err = Config::default().client_settings().unwrap_err();
        assert!(err.to_string().contains("No API endpoint configured"));
    }

    #[test]
    fn test_read_password_strips_line_ending() {
        let mut config = Config::default();
        config.read_password("s3cret pass\r\nignored\n".as_bytes()).unwrap();
        assert_eq!(config.password.as_deref(), Some("s3cret pass"));
    }

    #[test]
    fn test_read_password_rejects_empty_input() {
        let mut config = Config::default();
        assert!(config.read_password("\n".as_bytes()).is_err());
        assert!(config.password.is_none());
    }

    #[test]
    fn test_missing_password_points_to_stdin_flag() {
        let config = Config {
            base_url: Some("https://cmp.local:8443".into()),
            username: Some("admin".into()),
            ..Config::default()
        };
        let err = config.client_settings().unwrap_err();
        assert!(err.to_string().contains("--password-stdin"));
    }

    #[test]
    fn test_client_settings() {
        let config = Config {
            base_url: Some("https://cmp.local:8443".into()),
            username: Some("admin".into()),
            password: Some("pw".into()),
            timeout_secs: 10,
            ..Config::default()
        };
        let settings = config.client_settings().unwrap();
        assert_eq!(settings.base_url.port(), Some(8443));
        assert_eq!(settings.credentials.username, "admin");
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }
}
