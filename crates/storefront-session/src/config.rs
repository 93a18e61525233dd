//! # Storefront Configuration
//!
//! Configuration for the remote API, listing, toasts and session handling.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_API_BASE=https://dummyjson.com                          │
//! │     STOREFRONT_ITEMS_PER_PAGE=24                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.storefront/ (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     dummyjson.com, 12 per page, 3s toasts, 7-day token                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! base_url = "https://dummyjson.com"
//! timeout_secs = 10
//!
//! [catalog]
//! items_per_page = 12
//!
//! [toast]
//! default_duration_ms = 3000
//!
//! [session]
//! login_path = "/login"
//! token_max_age_days = 7
//! # token_path = "/custom/auth-token.json"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_core::DEFAULT_ITEMS_PER_PAGE;
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

const CONFIG_FILE_NAME: &str = "storefront.toml";
const TOKEN_FILE_NAME: &str = "auth-token.json";

// =============================================================================
// API Settings
// =============================================================================

/// Remote data source and auth endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL; endpoint paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://dummyjson.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            items_per_page: default_items_per_page(),
        }
    }
}

// =============================================================================
// Toast Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastSettings {
    /// How long a toast stays up when no duration is given (milliseconds).
    #[serde(default = "default_toast_duration")]
    pub default_duration_ms: u64,
}

fn default_toast_duration() -> u64 {
    3000
}

impl Default for ToastSettings {
    fn default() -> Self {
        ToastSettings {
            default_duration_ms: default_toast_duration(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Where guards and logout send the visitor.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Lifetime of the persisted auth token.
    #[serde(default = "default_token_max_age")]
    pub token_max_age_days: u32,

    /// Token file location. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_token_max_age() -> u32 {
    7
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            login_path: default_login_path(),
            token_max_age_days: default_token_max_age(),
            token_path: None,
        }
    }
}

// =============================================================================
// Main Storefront Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub toast: ToastSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl StorefrontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| SessionError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SessionError::InvalidConfig(format!(
                "API base URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.catalog.items_per_page == 0 {
            return Err(SessionError::InvalidConfig(
                "items_per_page must be greater than 0".into(),
            ));
        }

        if self.session.token_max_age_days == 0 {
            return Err(SessionError::InvalidConfig(
                "token_max_age_days must be greater than 0".into(),
            ));
        }

        if !self.session.login_path.starts_with('/') {
            return Err(SessionError::InvalidConfig(format!(
                "login_path must be an absolute path, got: {}",
                self.session.login_path
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("STOREFRONT_API_BASE") {
            debug!(url = %url, "Overriding API base URL from environment");
            self.api.base_url = url;
        }

        if let Ok(per_page) = std::env::var("STOREFRONT_ITEMS_PER_PAGE") {
            match per_page.parse::<usize>() {
                Ok(n) => self.catalog.items_per_page = n,
                Err(_) => {
                    warn!(value = %per_page, "Ignoring non-numeric STOREFRONT_ITEMS_PER_PAGE")
                }
            }
        }

        if let Ok(duration) = std::env::var("STOREFRONT_TOAST_DURATION_MS") {
            if let Ok(ms) = duration.parse::<u64>() {
                self.toast.default_duration_ms = ms;
            }
        }

        if let Ok(path) = std::env::var("STOREFRONT_TOKEN_PATH") {
            debug!(path = %path, "Overriding token path from environment");
            self.session.token_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolved token file path: explicit setting, else the platform data dir.
    pub fn token_path(&self) -> Option<PathBuf> {
        self.session.token_path.clone().or_else(|| {
            Self::project_dirs().map(|dirs| dirs.data_dir().join(TOKEN_FILE_NAME))
        })
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast.default_duration_ms)
    }

    pub fn token_max_age(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.session.token_max_age_days))
    }

    pub fn login_path(&self) -> &str {
        &self.session.login_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.base_url, "https://dummyjson.com");
        assert_eq!(config.catalog.items_per_page, 12);
        assert_eq!(config.toast_duration(), Duration::from_millis(3000));
        assert_eq!(config.token_max_age(), chrono::Duration::days(7));
        assert_eq!(config.login_path(), "/login");
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();
        assert!(config.validate().is_ok());

        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "http://localhost:8080".to_string();
        assert!(config.validate().is_ok());

        config.catalog.items_per_page = 0;
        assert!(config.validate().is_err());

        config.catalog.items_per_page = 24;
        config.session.token_max_age_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [catalog]
            items_per_page = 24
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.items_per_page, 24);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.session.token_max_age_days, 7);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("storefront-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("storefront.toml");

        let mut config = StorefrontConfig::default();
        config.catalog.items_per_page = 30;
        config.session.token_path = Some(dir.join("token.json"));
        config.save(Some(path.clone())).unwrap();

        let loaded = StorefrontConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.catalog.items_per_page, 30);
        assert_eq!(loaded.token_path(), Some(dir.join("token.json")));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_toml_serialization() {
        let config = StorefrontConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[session]"));
        assert!(!toml_str.contains("token_path"));
    }
}
