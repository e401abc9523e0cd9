//! Application configuration and API environment selection.
//!
//! Configuration holds non-secret preferences (last email, page size,
//! language). Tokens never go here; they live in the session store.
//!
//! Configuration is stored at `~/.config/rfqdesk/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config directory paths
const APP_NAME: &str = "rfqdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Base URL for development builds (local API server)
const DEV_BASE_URL: &str = "http://localhost:3000/api";

/// Base URL for release builds
const PROD_BASE_URL: &str = "https://virfq.com/api";

/// Which API the client talks to. Picked at compile time: debug builds get
/// the local server, release builds get production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEnv {
    Development,
    Production,
}

impl ApiEnv {
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            ApiEnv::Development
        } else {
            ApiEnv::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            ApiEnv::Development => DEV_BASE_URL,
            ApiEnv::Production => PROD_BASE_URL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub last_email: Option<String>,
    pub page_size: Option<u32>,
    pub prefer_vietnamese: Option<bool>,
}

impl Config {
    /// Load the config, falling back to defaults if it is missing or
    /// unreadable. A corrupt config file must not block startup.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "could not load config; using defaults");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
