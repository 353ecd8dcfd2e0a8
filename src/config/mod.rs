//! # Configuration Management Module
//!
//! TOML configuration for the bot, with defaults for every section and environment
//! overrides for deployment secrets.
//!
//! ## Configuration Structure
//!
//! - [`BotConfig`] - display name and command prefix
//! - [`StorageConfig`] - location of the player data file
//! - [`LoggingConfig`] - log level and optional log file
//! - [`OracleConfig`] - text-generation endpoint used by the language games
//!
//! ## Usage
//!
//! ```rust,no_run
//! use coinbot::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml").await?;
//!     println!("Data file: {}", config.storage.data_path);
//!     Config::create_default("config.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [bot]
//! name = "Coin Bot"
//! command_prefix = "/"
//!
//! [storage]
//! data_path = "data/users.json"
//!
//! [oracle]
//! enabled = true
//! api_key = "..."
//! model = "openai/gpt-20-oss"
//! ```
//!
//! ## Environment Integration
//!
//! Precedence: CLI args > Environment > Config file > Defaults. Recognized variables:
//! `DATA_PATH`, `COMMAND_PREFIX`, `AI_GATEWAY_API_KEY`, `AI_GATEWAY_BASE_URL`,
//! `AI_GATEWAY_MODEL`. A non-empty `AI_GATEWAY_API_KEY` also enables the oracle.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

pub const DEFAULT_BASE_URL: &str = "https://ai-gateway.vercel.sh/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-20-oss";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub name: String,
    pub command_prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "Coin Bot".to_string(),
            command_prefix: "/".to_string(),
        }
    }
}

impl BotConfig {
    /// The configured prefix, or `/` when it is blank.
    pub fn prefix(&self) -> &str {
        let p = self.command_prefix.trim();
        if p.is_empty() {
            "/"
        } else {
            p
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: "data/users.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("coinbot.log".to_string()),
        }
    }
}

/// Text-generation endpoint (any OpenAI-compatible chat-completions API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub enabled: bool,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound on one generation call, in seconds.
    pub timeout_seconds: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.8,
            timeout_seconds: 20,
        }
    }
}

impl OracleConfig {
    /// Enabled and holding a key. The language games are only offered when this is true.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

impl Config {
    /// Load configuration from a file, then apply environment overrides.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let mut config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields defaults (plus environment).
    /// A file that exists but does not parse is still an error. Logging is usually not
    /// set up yet when this runs, so callers report the missing file themselves.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            return Self::load(path).await;
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` as the environment.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("DATA_PATH") {
            self.storage.data_path = v;
        }
        if let Some(v) = non_empty("COMMAND_PREFIX") {
            self.bot.command_prefix = v;
        }
        if let Some(v) = non_empty("AI_GATEWAY_API_KEY") {
            self.oracle.api_key = v;
            self.oracle.enabled = true;
        }
        if let Some(v) = non_empty("AI_GATEWAY_BASE_URL") {
            self.oracle.base_url = v;
        }
        if let Some(v) = non_empty("AI_GATEWAY_MODEL") {
            self.oracle.model = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            data_path = "/var/lib/coinbot/users.json"

            [oracle]
            model = "local/tiny"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.data_path, "/var/lib/coinbot/users.json");
        assert_eq!(config.oracle.model, "local/tiny");
        assert_eq!(config.oracle.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.oracle.timeout_seconds, 20);
        assert_eq!(config.bot.prefix(), "/");
        assert!(!config.oracle.is_configured());
    }

    #[test]
    fn test_env_key_enables_oracle() {
        let env: HashMap<&str, &str> = [
            ("AI_GATEWAY_API_KEY", "sk-test"),
            ("DATA_PATH", "/tmp/users.json"),
            ("AI_GATEWAY_MODEL", "   "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        assert!(config.oracle.is_configured());
        assert_eq!(config.oracle.api_key, "sk-test");
        assert_eq!(config.storage.data_path, "/tmp/users.json");
        // blank values are ignored
        assert_eq!(config.oracle.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_enabled_without_key_is_not_configured() {
        let mut config = OracleConfig::default();
        config.enabled = true;
        assert!(!config.is_configured());
        config.api_key = "k".into();
        assert!(config.is_configured());
    }

    #[test]
    fn test_any_prefix_is_honored() {
        for prefix in ["!", ".", "?", "coin:"] {
            let mut config = Config::default();
            config.apply_overrides_from(|k| (k == "COMMAND_PREFIX").then(|| prefix.to_string()));
            assert_eq!(config.bot.prefix(), prefix);
        }
        let bot = BotConfig {
            name: "x".into(),
            command_prefix: "  ".into(),
        };
        assert_eq!(bot.prefix(), "/");
    }

    #[test]
    fn test_default_config_serializes() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("[oracle]"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.logging.level, "info");
        assert_eq!(back.oracle.temperature, 0.8);
    }
}
