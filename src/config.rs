use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if let Some(stripped) = s.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if s == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

/// Size of the map viewport in device points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: defaults::VIEWPORT_WIDTH,
            height: defaults::VIEWPORT_HEIGHT,
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> kurbo::Size {
        kurbo::Size::new(self.width, self.height)
    }
}

/// Configuration for campus-parking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base address of the occupancy backend
    #[serde(default = "defaults::api_base_url")]
    pub api_base_url: String,
    /// Seconds between occupancy refreshes
    #[serde(default = "defaults::poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Location of the campus parking map document
    #[serde(default = "defaults::parking_map_url")]
    pub parking_map_url: String,
    /// Where downloaded documents are kept
    #[serde(default = "defaults::cache_dir")]
    pub cache_dir: PathBuf,
    /// Map viewport dimensions
    #[serde(default)]
    pub viewport: ViewportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: defaults::api_base_url(),
            poll_interval_secs: defaults::poll_interval_secs(),
            parking_map_url: defaults::parking_map_url(),
            cache_dir: defaults::cache_dir(),
            viewport: ViewportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file (if any) and environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };
        tracing::debug!("loading campus-parking config from {:?}", config_path);
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else if path.is_some() {
            anyhow::bail!("config file not found at {:?}", config_path);
        } else {
            Self::default()
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the app cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than zero");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var("CAMPUS_PARKING_API_URL") {
            self.api_base_url = url;
        }

        if let Ok(secs) = env::var("CAMPUS_PARKING_POLL_SECS") {
            self.poll_interval_secs = secs
                .parse()
                .context("Failed to parse CAMPUS_PARKING_POLL_SECS as u64")?;
        }

        if let Ok(path) = env::var("CAMPUS_PARKING_CACHE_DIR") {
            self.cache_dir = expand_tilde(&PathBuf::from(path));
        }
        Ok(())
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.cache_dir = expand_tilde(&config.cache_dir);
        config.validate()?;

        Ok(config)
    }

    /// Get default config file path
    pub fn config_file_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".config/campus-parking/config.yaml"))
            .context("Could not determine home directory for config file")
    }

    /// Get cache directory, creating it if necessary
    pub fn ensure_cache_dir(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.cache_dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", self.cache_dir))?;
        Ok(self.cache_dir.clone())
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub(crate) const VIEWPORT_WIDTH: f64 = 390.0;
    pub(crate) const VIEWPORT_HEIGHT: f64 = 844.0;

    pub(crate) fn api_base_url() -> String {
        "http://127.0.0.1:8000".to_string()
    }

    pub(crate) fn poll_interval_secs() -> u64 {
        120
    }

    pub(crate) fn parking_map_url() -> String {
        "https://www.atu.edu/psafe/docs/ATU%20Parking%20Map%202024.pdf".to_string()
    }

    pub(crate) fn cache_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|dir| dir.join("campus-parking"))
            .unwrap_or_else(|| PathBuf::from(".campus-parking"))
    }
}
