//! Configuration management for the Parel portal
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! A configuration that fails validation is fatal: the portal refuses to
//! start rather than running against an unknown backend or identity
//! provider.

use crate::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Main configuration structure for the portal
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Identity provider settings
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Application origin settings
    #[serde(default)]
    pub app: AppConfig,
    /// Discord account linking settings
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Notification timing
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Navigation timing
    #[serde(default)]
    pub navigation: NavigationConfig,
    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint is appended to (e.g. `https://api.parel.agency`)
    #[serde(default)]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IdentityConfig {
    /// Public key identifying this application to the identity provider
    #[serde(default)]
    pub publishable_key: String,
}

/// Application origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin the portal is served from; links on this origin stay in-app
    #[serde(default = "default_origin")]
    pub origin: String,
}

fn default_origin() -> String {
    "http://localhost:5173".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

/// Discord account linking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Where the identity provider sends the user after linking
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Identity provider strategy used for linking
    #[serde(default = "default_discord_strategy")]
    pub strategy: String,
}

fn default_discord_strategy() -> String {
    "oauth_discord".to_string()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            redirect_uri: None,
            strategy: default_discord_strategy(),
        }
    }
}

/// Notification timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Delay between insertion and the fade-in (milliseconds)
    #[serde(default = "default_enter_delay")]
    pub enter_delay_ms: u64,

    /// How long a notification stays fully visible (milliseconds)
    #[serde(default = "default_display")]
    pub display_ms: u64,

    /// Fallback removal delay when no transition-end signal arrives (milliseconds)
    #[serde(default = "default_fade")]
    pub fade_ms: u64,
}

fn default_enter_delay() -> u64 {
    10
}

fn default_display() -> u64 {
    4000
}

fn default_fade() -> u64 {
    500
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: default_enter_delay(),
            display_ms: default_display(),
            fade_ms: default_fade(),
        }
    }
}

impl NotificationConfig {
    /// Delay before a new notification becomes visible
    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(self.enter_delay_ms)
    }

    /// Visible duration
    pub fn display(&self) -> Duration {
        Duration::from_millis(self.display_ms)
    }

    /// Fade-out fallback
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

/// Navigation timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Delay before redirecting to a newly created project (milliseconds)
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u64,
}

fn default_redirect_delay() -> u64 {
    1500
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: default_redirect_delay(),
        }
    }
}

impl NavigationConfig {
    /// Post-creation redirect delay
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse configuration from a YAML string
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the YAML is malformed
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| PortalError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PortalError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&contents)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("PORTAL_API_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("PORTAL_API_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(value) => self.api.timeout_seconds = value,
                Err(_) => tracing::warn!("Invalid PORTAL_API_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(key) = std::env::var("PORTAL_PUBLISHABLE_KEY") {
            self.identity.publishable_key = key;
        }

        if let Ok(origin) = std::env::var("PORTAL_APP_ORIGIN") {
            self.app.origin = origin;
        }

        if let Ok(redirect_uri) = std::env::var("PORTAL_DISCORD_REDIRECT_URI") {
            tracing::debug!(redirect_uri = %redirect_uri, "Env override: PORTAL_DISCORD_REDIRECT_URI");
            self.discord.redirect_uri = Some(redirect_uri);
        }

        if let Ok(delay) = std::env::var("PORTAL_REDIRECT_DELAY_MS") {
            match delay.parse() {
                Ok(value) => self.navigation.redirect_delay_ms = value,
                Err(_) => tracing::warn!("Invalid PORTAL_REDIRECT_DELAY_MS: {}", delay),
            }
        }

        if let Ok(level) = std::env::var("PORTAL_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(json_logs) = std::env::var("PORTAL_JSON_LOGS") {
            match json_logs.parse::<bool>() {
                Ok(v) => self.logging.json_format = v,
                Err(_) => tracing::warn!("Invalid value for PORTAL_JSON_LOGS: {}", json_logs),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.identity.publishable_key.trim().is_empty() {
            return Err(PortalError::Config(
                "Missing identity publishable key. Set identity.publishable_key or PORTAL_PUBLISHABLE_KEY"
                    .to_string(),
            )
            .into());
        }

        if self.api.base_url.trim().is_empty() {
            return Err(PortalError::Config(
                "Missing API base URL. Set api.base_url or PORTAL_API_URL".to_string(),
            )
            .into());
        }

        let base = Url::parse(&self.api.base_url).map_err(|e| {
            PortalError::Config(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(PortalError::Config(format!(
                "api.base_url must use http or https, got {}",
                base.scheme()
            ))
            .into());
        }

        Url::parse(&self.app.origin).map_err(|e| {
            PortalError::Config(format!("Invalid app.origin {}: {}", self.app.origin, e))
        })?;

        if let Some(redirect) = &self.discord.redirect_uri {
            Url::parse(redirect).map_err(|e| {
                PortalError::Config(format!("Invalid discord.redirect_uri {}: {}", redirect, e))
            })?;
        }

        if self.api.timeout_seconds == 0 {
            return Err(PortalError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.notifications.display_ms == 0 {
            return Err(PortalError::Config(
                "notifications.display_ms must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Parsed application origin
    ///
    /// # Errors
    ///
    /// Returns an error if `app.origin` is not a valid URL
    pub fn origin(&self) -> Result<Url> {
        Ok(Url::parse(&self.app.origin)?)
    }
}
