mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::LinkfixError;
use defaults::*;

/// Top-level linkfix configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub reply: ReplyConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub updater: UpdaterConfig,
    /// Ordered rewrite rules; first match wins at evaluation time.
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            reply: ReplyConfig::default(),
            store: StoreConfig::default(),
            channel: ChannelConfig::default(),
            updater: UpdaterConfig::default(),
            rules: default_rules(),
        }
    }
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Reply settings for automatic fixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Line prepended to every automatic-fix reply.
    #[serde(default = "default_reply_prefix")]
    pub prefix: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            prefix: default_reply_prefix(),
        }
    }
}

/// Durable store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub telegram: Option<TelegramConfig>,
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
}

/// Self-update checker config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_update_interval")]
    pub interval_minutes: u64,
    /// Git checkout to keep in sync with its upstream.
    #[serde(default = "default_repo_dir")]
    pub repo_dir: String,
    /// Delay before the first check after startup.
    #[serde(default = "default_initial_delay")]
    pub initial_delay_secs: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: default_update_interval(),
            repo_dir: default_repo_dir(),
            initial_delay_secs: default_initial_delay(),
        }
    }
}

/// One raw rewrite rule record, as written in the config file.
/// Validated and compiled into a `RewriteRule` at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Domains that trigger the rule (e.g. "twitter.com", "x.com").
    pub match_domains: Vec<String>,
    /// Domains whose presence marks a link as already fixed. Empty means
    /// "just the replacement domain".
    #[serde(default)]
    pub alternative_domains: Vec<String>,
    /// Canonical domain substituted into matched text.
    pub replace_with: String,
    /// Label used for per-platform counting. Derived from the first match
    /// domain when omitted.
    #[serde(default)]
    pub platform: Option<String>,
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. A file that exists
/// but cannot be read or parsed is an error; the caller treats it as
/// startup-fatal.
pub fn load(path: &str) -> Result<Config, LinkfixError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| LinkfixError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| LinkfixError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
