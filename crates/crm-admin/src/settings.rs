//! Application configuration.
//!
//! Loaded from `config/admin.toml` (optional) and overridden by environment variables
//! prefixed `CRM_ADMIN`, with `__` between path segments:
//!
//! ```bash
//! CRM_ADMIN__BACKEND__URL=https://project.backend.example
//! CRM_ADMIN__BACKEND__API_KEY=...
//! CRM_ADMIN__INVENTORY__COMMIT_TIMEOUT_MS=5000
//! ```

use ::config::{Config, Environment, File, FileFormat};
use edit_framework::DEFAULT_COMMIT_TIMEOUT;
use serde::Deserialize;
use std::time::Duration;

pub use ::config::ConfigError;

pub const CONFIG_FILE: &str = "config/admin.toml";
const ENV_PREFIX: &str = "CRM_ADMIN";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub inventory: InventorySettings,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InventorySettings {
    #[serde(default = "default_commit_timeout_ms")]
    pub commit_timeout_ms: u64,
    #[serde(default = "default_editor_buffer")]
    pub editor_buffer: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,
}

fn default_storage_bucket() -> String {
    "product-images".to_string()
}

fn default_commit_timeout_ms() -> u64 {
    DEFAULT_COMMIT_TIMEOUT.as_millis() as u64
}

fn default_editor_buffer() -> usize {
    32
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_low_stock_threshold() -> u32 {
    5
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            storage_bucket: default_storage_bucket(),
        }
    }
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            commit_timeout_ms: default_commit_timeout_ms(),
            editor_buffer: default_editor_buffer(),
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

impl AdminConfig {
    /// Load from `config/admin.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parse a TOML document with no environment overrides.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Everything `AdminSystem::start` needs before spawning anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        self.inventory.validate()
    }
}

impl BackendSettings {
    /// Fails fast on missing connection settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Message("backend.url is not set".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "backend.api_key is not set".to_string(),
            ));
        }
        Ok(())
    }
}

impl InventorySettings {
    /// A zero buffer cannot back a channel and a zero timeout fails every save.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor_buffer == 0 {
            return Err(ConfigError::Message(
                "inventory.editor_buffer must be at least 1".to_string(),
            ));
        }
        if self.commit_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "inventory.commit_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn commit_timeout(&self) -> Duration {
        Duration::from_millis(self.commit_timeout_ms)
    }
}

impl FilterSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
