//! Configuration loading
//!
//! Settings live in `~/.billfold/config.yaml`; every field is optional and
//! `BILLFOLD_API_URL` / `BILLFOLD_TOKEN` override what the file says.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_API_URL;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the bill service
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Sent verbatim as the `Authorization` header
    #[serde(default)]
    pub token: Option<String>,
    /// Directory the log file is written to
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            token: None,
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    /// Default config directory (`~/.billfold`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".billfold")
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Config> {
        let mut config = Config::load_from(&Config::config_dir().join(CONFIG_FILE))?;
        config.apply_overrides(
            std::env::var("BILLFOLD_API_URL").ok(),
            std::env::var("BILLFOLD_TOKEN").ok(),
        );
        Ok(config)
    }

    /// Load from a specific file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    fn apply_overrides(&mut self, api_url: Option<String>, token: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.is_empty()) {
            self.api_url = url;
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "token: abc123\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "api_url: [unterminated\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("http://bills.local".into()), Some(String::new()));
        assert_eq!(config.api_url, "http://bills.local");
        assert_eq!(config.token, None);
    }
}
