//! Configuration file structures for the sunwatch bot.
//!
//! The configuration is read from a YAML file and can be overridden by
//! environment variables prefixed with `SUNWATCH_`, nested keys being
//! separated by `__` (e.g. `SUNWATCH_TELEGRAM__TOKEN`).
//!
//! # Configuration File Format
//!
//! ```yaml
//! sfl:
//!   # Base URL of the Sunflower Land API
//!   url: "https://api.sunflower-land.com"
//!   # Community API key
//!   api_key: "sfl.key"
//!   # Seconds between two scans of every farm
//!   polling_interval: 300
//!   # Seconds between two farm fetches inside one scan
//!   request_delay: 10
//!   # HTTP timeout in seconds
//!   timeout: 10
//!
//! telegram:
//!   url: "https://api.telegram.org"
//!   token: "123456:ABC"
//!   # Seconds between two command drains
//!   command_interval: 5
//!   # Long-poll duration of getUpdates in seconds
//!   poll_timeout: 25
//!   # Optional, commands addressed to another bot are ignored
//!   username: "sunwatch_bot"
//! ```
//!
//! Only `sfl.api_key` and `telegram.token` are required.

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Deserialize, Debug)]
pub struct Config {
    /// Sunflower Land API configuration
    pub sfl: Sfl,
    /// Telegram bot configuration
    pub telegram: Telegram,
}

/// Sunflower Land API configuration.
#[derive(Deserialize, Debug)]
pub struct Sfl {
    /// Base URL of the API, without trailing slash.
    #[serde(default = "default_sfl_url")]
    pub url: String,

    /// Community API key, sent as `X-API-Key`.
    pub api_key: String,

    /// Polling interval in seconds.
    ///
    /// How frequently every registered farm is checked.
    #[serde(default = "default_polling_interval")]
    pub polling_interval: u64,

    /// Pause in seconds between two farm fetches of the same scan.
    #[serde(default = "default_request_delay")]
    pub request_delay: u64,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Telegram bot configuration.
#[derive(Deserialize, Debug)]
pub struct Telegram {
    /// Base URL of the Bot API, without trailing slash.
    #[serde(default = "default_telegram_url")]
    pub url: String,

    /// Bot token given by BotFather.
    pub token: String,

    /// Seconds between two command drains.
    #[serde(default = "default_command_interval")]
    pub command_interval: u64,

    /// Long-poll duration of `getUpdates` in seconds.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout: u64,

    /// Username of the bot, without `@`.
    #[serde(default)]
    pub username: Option<String>,
}

fn default_sfl_url() -> String {
    "https://api.sunflower-land.com".to_owned()
}

fn default_polling_interval() -> u64 {
    300
}

fn default_request_delay() -> u64 {
    10
}

fn default_timeout() -> u64 {
    10
}

fn default_telegram_url() -> String {
    "https://api.telegram.org".to_owned()
}

fn default_command_interval() -> u64 {
    5
}

fn default_poll_timeout() -> u64 {
    25
}

impl Config {
    /// Loads the configuration from a YAML file merged with `SUNWATCH_` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a value has the wrong type.
    pub fn load(path: &str) -> Result<Config, anyhow::Error> {
        let mut config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("SUNWATCH_").split("__"))
            .extract()?;

        // Normalize URLs by removing trailing slashes
        config.sfl.url = config.sfl.url.trim_end_matches('/').to_owned();
        config.telegram.url = config.telegram.url.trim_end_matches('/').to_owned();

        Ok(config)
    }
}
