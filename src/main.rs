//! Sunwatch - A Telegram bot for Sunflower Land farm notifications.
//!
//! Sunwatch watches Sunflower Land farms and tells their owners on Telegram
//! when crops, trees, stones and beehives are ready, and when the Floating
//! Island opens or is about to close. Every readiness cycle is announced once:
//! an alert fires when a resource becomes ready and re-arms only after the
//! resource has been harvested.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! sfl:
//!   api_key: "your-api-key"
//!   polling_interval: 300
//!
//! telegram:
//!   token: "123456:ABC"
//!   username: "sunwatch_bot"
//! ```
//!
//! See [`config`] for every key and its default.
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `SUNWATCH_` prefix:
//!
//! ```bash
//! export SUNWATCH_SFL__API_KEY="your-api-key"
//! export SUNWATCH_TELEGRAM__TOKEN="123456:ABC"
//! ```
//!
//! # Usage
//!
//! ```bash
//! sunwatch --config config.yaml --data ./sunwatch-data
//! ```
//!
//! # Bot Commands
//!
//! - `/start` - Welcome message
//! - `/help` - Display help information
//! - `/setfarm <farm_id>` - Monitor a farm in this chat
//! - `/getfarm` - Show the monitored farm
//! - `/crops`, `/trees`, `/stones`, `/beehive` - Readiness of one resource kind
//! - `/globe` - Floating Island schedule
//!
//! # Architecture
//!
//! - [`bot`] - Main loop draining commands and scheduling farm scans
//! - [`commands`] - Command parsing and execution
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`farm`] - Sunflower Land API client and farm snapshots
//! - [`fleet`] - Sequential scan of every registered farm
//! - [`readiness`] - Readiness computation, notification dedup and alert texts
//! - [`telegram`] - Telegram Bot API client
//! - [`users`] - User records and their JSON persistence
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod farm;
mod fleet;
mod readiness;
mod telegram;
mod users;

/// Command-line arguments for the Sunwatch bot.
///
/// # Examples
///
/// ```bash
/// sunwatch --config config.yaml --data ./sunwatch-data
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// See the [`config`] module for the expected format.
    #[arg(short, long)]
    config: String,

    /// Path to the directory for storing persistent data.
    ///
    /// This directory will contain `users.json`: the registered farm, the
    /// notification flags and the last handled update of every chat.
    #[arg(short, long)]
    data: String,
}

/// Main entry point for the Sunwatch bot.
///
/// Sets up logging (`info` unless `RUST_LOG` says otherwise), parses the
/// arguments, loads the configuration and runs the bot forever. Configuration
/// and initialization errors are logged and end the process cleanly.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting sunwatch {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = match Bot::new(config, &args) {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize bot: {}", e);
            return;
        }
    };
    bot.start().await;
}
