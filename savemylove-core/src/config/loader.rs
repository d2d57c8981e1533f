use crate::config::api_keys::{ApiKeySources, load_dotenv, resolve_api_key};
use crate::config::constants::{defaults, display, env, headers, models, streaming, urls};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Completion endpoint settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL the endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token. Usually supplied through `OPENROUTER_API_KEY` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for plain text prompts
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Model used when a prompt carries an image
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Model used for very long inputs such as chat exports
    #[serde(default = "default_unlimited_model")]
    pub unlimited_model: String,

    /// Value of the `HTTP-Referer` header
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Value of the `X-Title` header
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_base_url() -> String {
    urls::OPENROUTER_API_BASE.to_string()
}
fn default_model() -> String {
    models::DEFAULT_MODEL.to_string()
}
fn default_image_model() -> String {
    models::DEFAULT_IMAGE_MODEL.to_string()
}
fn default_unlimited_model() -> String {
    models::DEFAULT_UNLIMITED_MODEL.to_string()
}
fn default_referer() -> String {
    headers::DEFAULT_REFERER.to_string()
}
fn default_title() -> String {
    headers::DEFAULT_TITLE.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            default_model: default_model(),
            image_model: default_image_model(),
            unlimited_model: default_unlimited_model(),
            referer: default_referer(),
            title: default_title(),
        }
    }
}

/// Sink delivery settings for streamed responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingConfig {
    /// Attempts per delta before giving up on it
    #[serde(default = "default_max_delivery_attempts")]
    pub max_delivery_attempts: u32,

    /// Fixed pause between delivery attempts, in milliseconds
    #[serde(default = "default_delivery_backoff_ms")]
    pub delivery_backoff_ms: u64,
}

fn default_max_delivery_attempts() -> u32 {
    streaming::MAX_DELIVERY_ATTEMPTS
}
fn default_delivery_backoff_ms() -> u64 {
    streaming::DELIVERY_BACKOFF_MS
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            max_delivery_attempts: default_max_delivery_attempts(),
            delivery_backoff_ms: default_delivery_backoff_ms(),
        }
    }
}

impl StreamingConfig {
    pub fn delivery_backoff(&self) -> Duration {
        Duration::from_millis(self.delivery_backoff_ms)
    }
}

/// Display surface settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub auto_scroll: bool,

    /// Distance from the bottom, in pixels, still treated as "at bottom"
    #[serde(default = "default_scroll_tolerance")]
    pub scroll_tolerance_px: f64,
}

fn default_true() -> bool {
    true
}
fn default_scroll_tolerance() -> f64 {
    display::SCROLL_TOLERANCE_PX
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            auto_scroll: default_true(),
            scroll_tolerance_px: default_scroll_tolerance(),
        }
    }
}

/// Main configuration structure for SaveMyLove
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub streaming: StreamingConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from the current directory and the process environment
    pub fn load() -> Result<Self> {
        load_dotenv()?;
        let workspace = std::env::current_dir().context("cannot determine current dir")?;
        let mut config = Self::load_from_workspace(&workspace)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load `savemylove.toml` (or `.savemylove/savemylove.toml`) from a directory,
    /// falling back to defaults when neither exists.
    pub fn load_from_workspace(workspace: impl AsRef<Path>) -> Result<Self> {
        let workspace = workspace.as_ref();
        let candidates: [PathBuf; 2] = [
            workspace.join(defaults::CONFIG_FILE_NAME),
            workspace
                .join(defaults::DOT_DIR)
                .join(defaults::CONFIG_FILE_NAME),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        debug!(workspace = %workspace.display(), "no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Overlay values read through `lookup` onto this configuration.
    ///
    /// Blank variables are ignored so an empty `OPENROUTER_DEFAULT_MODEL=` line
    /// in a `.env` file does not wipe out the default.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_url) = read(env::API_URL) {
            self.provider.base_url = base_url;
        }
        if let Some(model) = read(env::DEFAULT_MODEL) {
            self.provider.default_model = model;
        }
        if let Some(model) = read(env::IMAGE_MODEL) {
            self.provider.image_model = model;
        }
        if let Some(model) = read(env::UNLIMITED_MODEL) {
            self.provider.unlimited_model = model;
        }

        let sources = ApiKeySources::with_config_value(self.provider.api_key.take());
        self.provider.api_key = resolve_api_key(&sources, &lookup);
    }

    /// Write a sample configuration file with every default spelled out
    pub fn create_sample_config(output: impl AsRef<Path>) -> Result<()> {
        let output = output.as_ref();
        let content = toml::to_string_pretty(&AppConfig::default())
            .context("Failed to serialize default configuration")?;
        fs::write(output, content)
            .with_context(|| format!("Failed to write config file: {}", output.display()))?;
        Ok(())
    }
}
