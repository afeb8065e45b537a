//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the Frappe site URL, the API key, the last opened campaign
//! and display preferences.
//!
//! Configuration is stored at `~/.config/campaign-dash/config.json`. The
//! `CAMPAIGN_DASH_*` environment variables override stored values.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{ApiCredentials, CredentialStore};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "campaign-dash";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default number of recipient rows fetched per list.
const DEFAULT_RECIPIENT_PAGE_LENGTH: u32 = 100;

pub const ENV_SITE_URL: &str = "CAMPAIGN_DASH_SITE_URL";
pub const ENV_API_KEY: &str = "CAMPAIGN_DASH_API_KEY";
pub const ENV_API_SECRET: &str = "CAMPAIGN_DASH_API_SECRET";

fn default_recipient_page_length() -> u32 {
    DEFAULT_RECIPIENT_PAGE_LENGTH
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site_url: Option<String>,
    pub api_key: Option<String>,
    pub last_campaign: Option<String>,
    /// Translation to load from `translations/<language>.json`
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_recipient_page_length")]
    pub recipient_page_length: u32,
    /// List campaigns without a Zoho link in the picker too
    #[serde(default)]
    pub show_all_campaigns: bool,
    /// Secret supplied through the environment; never written to disk
    #[serde(skip)]
    api_secret_override: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: None,
            api_key: None,
            last_campaign: None,
            language: None,
            recipient_page_length: DEFAULT_RECIPIENT_PAGE_LENGTH,
            show_all_campaigns: false,
            api_secret_override: None,
        }
    }
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        debug!(site = ?config.site_url, api_key = ?config.api_key, "Config loaded");
        Ok(config)
    }

    /// Apply `CAMPAIGN_DASH_*` overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_SITE_URL) {
            self.site_url = Some(url);
        }
        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(secret) = non_empty(ENV_API_SECRET) {
            self.api_secret_override = Some(secret);
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
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for log files
    pub fn log_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("logs"))
    }

    /// Site URL, or an error telling the user how to configure it
    pub fn require_site_url(&self) -> Result<&str> {
        self.site_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No site configured. Run `campaign-dash --login` or set {}",
                    ENV_SITE_URL
                )
            })
    }

    /// Resolve API credentials: environment secret first, then the OS keychain.
    pub fn credentials(&self) -> Result<ApiCredentials> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured. Run `campaign-dash --login` or set {}",
                    ENV_API_KEY
                )
            })?;

        let secret = match self.api_secret_override {
            Some(ref secret) => secret.clone(),
            None => CredentialStore::get_secret(api_key)?,
        };
        Ok(ApiCredentials::new(api_key, &secret))
    }
}
