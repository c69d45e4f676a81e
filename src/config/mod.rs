use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = concat!("nominatim-search/", env!("CARGO_PKG_VERSION"));

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Settings applied to every request a [`NominatimSearch`](crate::NominatimSearch) makes
///
/// Loadable from TOML:
/// ```toml
/// base_url = "https://nominatim.example.org/search"
/// user_agent = "my-app/1.0 (https://example.org)"
/// email = "ops@example.org"
/// timeout_secs = 20
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Contact address sent as the `email` parameter, as the usage policy asks
    /// of heavy users
    #[serde(default)]
    pub email: Option<String>,
    /// Whole-request timeout; unset leaves the HTTP client's default (none)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            email: None,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        Ok(())
    }

    /// Read a specific config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// First parsable config file from the standard locations, if any
    pub fn load() -> Option<Self> {
        Self::load_from(&get_config_paths())
    }

    fn load_from(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config file");
                    return Some(config);
                }
                Err(e) => warn!(error = %e, "Skipping config file"),
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("nominatim-search.toml"));
    paths.push(PathBuf::from(".nominatim-search.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("nominatim-search").join("config.toml"));
        paths.push(config_dir.join("nominatim-search.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".nominatim-search.toml"));
    }

    paths
}
