//! Application configuration

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "FORGE";

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Forge API base URL
    pub api_base_url: String,
    /// Rows per library page
    pub page_size: u32,
    /// Delay between the last search keystroke and the list request
    pub debounce: Duration,
    /// How long a notification stays visible
    pub notification_ttl: Duration,
    /// Per-request timeout; generation endpoints can be slow
    pub http_timeout: Duration,
    /// Where the engine choice is persisted
    pub preferences_path: PathBuf,
    /// Where exported files are written
    pub download_dir: PathBuf,
    /// Whether a cloud generation key is configured
    pub cloud_key_configured: bool,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_url: Option<String>,
    api_host: String,
    api_port: u16,
    page_size: u32,
    debounce_ms: u64,
    notification_ttl_ms: u64,
    http_timeout_secs: u64,
    preferences_path: PathBuf,
    download_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from `FORGE_*` environment variables
    pub fn from_env() -> Result<Self> {
        let cloud_key_configured = env::var("GOOGLE_API_KEY")
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false);
        Self::load(Environment::with_prefix(ENV_PREFIX), cloud_key_configured)
    }

    /// Load from an explicit variable map instead of the process environment
    pub fn from_map(vars: HashMap<String, String>, cloud_key_configured: bool) -> Result<Self> {
        Self::load(
            Environment::with_prefix(ENV_PREFIX).source(Some(vars)),
            cloud_key_configured,
        )
    }

    fn load(environment: Environment, cloud_key_configured: bool) -> Result<Self> {
        let raw: RawConfig = Config::builder()
            .set_default("api_host", "localhost")?
            .set_default("api_port", 8000)?
            .set_default("page_size", 8)?
            .set_default("debounce_ms", 300)?
            .set_default("notification_ttl_ms", 3000)?
            .set_default("http_timeout_secs", 120)?
            .set_default("preferences_path", ".forge/preferences.json")?
            .set_default("download_dir", ".")?
            .add_source(environment.try_parsing(true))
            .build()
            .context("Failed to read FORGE_* configuration")?
            .try_deserialize()
            .context("Invalid FORGE_* configuration")?;

        anyhow::ensure!(raw.page_size > 0, "FORGE_PAGE_SIZE must be at least 1");

        let api_base_url = match raw.api_url {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://{}:{}", raw.api_host, raw.api_port),
        };

        Ok(Self {
            api_base_url,
            page_size: raw.page_size,
            debounce: Duration::from_millis(raw.debounce_ms),
            notification_ttl: Duration::from_millis(raw.notification_ttl_ms),
            http_timeout: Duration::from_secs(raw.http_timeout_secs),
            preferences_path: raw.preferences_path,
            download_dir: raw.download_dir,
            cloud_key_configured,
        })
    }
}
