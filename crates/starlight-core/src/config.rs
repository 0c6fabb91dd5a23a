use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StarlightError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub storage: StorageConfig,
    pub api: ApiConfig,
    pub modal: ModalConfig,
    pub continue_watching: ContinueWatchingConfig,
    pub navbar: NavbarConfig,
    pub logging: LoggingConfig,
    pub service_worker: ServiceWorkerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub bookmarks_key: String,
    pub watched_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Absolute origin for API calls. Empty means the page's own origin.
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalConfig {
    pub open_delay_ms: u64,
    pub close_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinueWatchingConfig {
    pub page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavbarConfig {
    pub desktop_breakpoint: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceWorkerConfig {
    pub script: String,
}

impl ServiceWorkerConfig {
    /// Script URL to register, `None` when disabled.
    pub fn script(&self) -> Option<&str> {
        Some(self.script.trim()).filter(|s| !s.is_empty())
    }
}

impl ModalConfig {
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

impl SiteConfig {
    /// Layer a page-supplied, possibly partial document over the built-in
    /// defaults. Tables merge key by key; any other value replaces.
    pub fn with_overrides(source: &str) -> Result<Self, StarlightError> {
        let mut base: toml::Table = toml::from_str(DEFAULT_CONFIG)
            .map_err(|e| StarlightError::Config(e.to_string()))?;
        let overrides: toml::Table =
            toml::from_str(source).map_err(|e| StarlightError::Config(e.to_string()))?;
        merge(&mut base, overrides);

        let config: SiteConfig = toml::Value::Table(base)
            .try_into()
            .map_err(|e: toml::de::Error| StarlightError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), StarlightError> {
        if self.continue_watching.page_size == 0 {
            return Err(StarlightError::Config(
                "continue_watching.page_size must be at least 1".into(),
            ));
        }
        if self.storage.bookmarks_key == self.storage.watched_key {
            return Err(StarlightError::Config(
                "storage keys for bookmarks and watched episodes must differ".into(),
            ));
        }
        Ok(())
    }
}

fn merge(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(table)) => merge(existing, table),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
