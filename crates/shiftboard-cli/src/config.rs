//! `shiftboard.toml` configuration
//!
//! ```toml
//! base_url = "http://optimizer.internal:8080/api"
//! timeout_secs = 10
//! window_start_hour = 6
//! label_every_hours = 3
//! ```
//!
//! Every key is optional. Command-line flags and `SHIFTBOARD_*` environment
//! variables take precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shiftboard_core::window::DEFAULT_START_HOUR;
use shiftboard_sync::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "shiftboard.toml";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
    pub window_start_hour: u32,
    pub label_every_hours: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            window_start_hour: DEFAULT_START_HOUR,
            label_every_hours: 4,
        }
    }
}

impl Config {
    /// Load an explicit file, or `shiftboard.toml` if present, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.exists() {
                    return Ok(Self::default());
                }
                local
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line and environment overrides
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Result<Self> {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.window_start_hour > 23 {
            bail!("window_start_hour must be 0-23, got {}", self.window_start_hour);
        }
        if self.label_every_hours == 0 {
            bail!("label_every_hours must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("base_url must be an http(s) URL, got '{}'", self.base_url);
        }
        Ok(())
    }
}
