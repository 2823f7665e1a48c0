//! Application configuration: `config.toml` plus environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stork_inventory_backend::RestConfig;
use stork_inventory_core::error::{CoreError, CoreResult};
use stork_inventory_core::{Language, PanelOptions};

/// Config directory name under the user config dir.
const APP_DIR: &str = "stork-inventory";
const CONFIG_FILE: &str = "config.toml";

pub const ENV_BACKEND_URL: &str = "STORK_BACKEND_URL";
pub const ENV_API_KEY: &str = "STORK_API_KEY";
pub const ENV_ACCESS_TOKEN: &str = "STORK_ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// PostgREST project URL; unset means no remote backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub language: Language,
    /// Defaults to the user's download dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            api_key: None,
            access_token: None,
            page_size: 20,
            search_debounce_ms: 300,
            language: Language::default(),
            export_dir: None,
            request_timeout_secs: 30,
        }
    }
}

impl InventoryConfig {
    /// `<config dir>/stork-inventory/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Load `path`, or defaults when it does not exist.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Default file plus environment overrides.
    pub fn load_default() -> CoreResult<Self> {
        Ok(Self::load(&Self::default_path())?.with_env())
    }

    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| CoreError::Config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::Config(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Serialization(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| CoreError::Config(format!("Failed to write {}: {e}", path.display())))
    }

    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `STORK_*` overrides from `lookup`; empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_BACKEND_URL) {
            self.backend_url = Some(url);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.page_size == 0 {
            return Err(CoreError::Config("page_size must be at least 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn panel_options(&self) -> PanelOptions {
        PanelOptions {
            page_size: self.page_size,
            language: self.language,
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Connection settings for the remote backend, `None` when no
    /// `backend_url` is configured.
    pub fn rest_config(&self) -> CoreResult<Option<RestConfig>> {
        let Some(url) = self.backend_url.as_deref() else {
            return Ok(None);
        };
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| CoreError::Config(format!("api_key is required (or set {ENV_API_KEY})")))?;
        let config = RestConfig::new(url, api_key)?
            .with_access_token(self.access_token.clone())
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs));
        Ok(Some(config))
    }
}
