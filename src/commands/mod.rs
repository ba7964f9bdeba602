//! Bot command parsing and response formatting.
//!
//! This module provides the complete command processing pipeline of the bot,
//! letting Telegram users register their farm and query its readiness.
//!
//! # Architecture
//!
//! ```text
//! Telegram message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← Entry point: parse() + parse_command()
//! └─────────────┘
//!      │
//!      ├── parse() ─────────────────────┐
//!      │                                ▼
//!      │                     ┌──────────────────┐
//!      │                     │ command::Command │
//!      │                     └──────────────────┘
//!      │
//!      └── parse_command() ─────────────┐
//!                                       ▼
//!                          ┌─────────────────────┐
//!                          │ Action Handlers     │
//!                          │  - handle_start     │
//!                          │  - handle_help      │
//!                          │  - handle_set_farm  │
//!                          │  - handle_get_farm  │
//!                          │  - handle_status    │
//!                          │  - handle_globe     │
//!                          └─────────────────────┘
//!                                       │
//!                                       ▼
//!                          ┌─────────────────────┐
//!                          │  CommandResult      │
//!                          │  - response (MD)    │
//!                          │  - farm to register │
//!                          └─────────────────────┘
//! ```
//!
//! # Command Structure
//!
//! All commands follow the Telegram format: `/<command>[@botname] [args...]`
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `start` | None | Welcome message |
//! | `help` | None | Display help information |
//! | `setfarm` | `<farm_id>` | Register the farm monitored for the chat |
//! | `getfarm` | None | Show the registered farm |
//! | `crops` | None | Crops readiness |
//! | `beehive` | None | Beehives production |
//! | `trees` | None | Trees readiness |
//! | `stones` | None | Stones readiness |
//! | `globe` | None | Floating Island schedule |
//!
//! # Error Handling
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): plain messages and
//!   commands addressed to another bot. No response is sent.
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): unknown commands and
//!   invalid arguments, answered with a helpful message.

mod actions;
mod command;
mod commander;
pub mod markdown_response;

pub use crate::commands::command::Command;
pub use crate::commands::commander::Commander;

/// Runtime context for command execution.
#[derive(Debug)]
pub struct CommandContext {
    /// Chat the command was sent in
    pub chat_id: String,
    /// Farm registered for the chat, if any
    pub farm_id: Option<String>,
    /// Current time in milliseconds since epoch
    pub now: i64,
}

/// Result of command execution.
///
/// Command handlers don't directly modify the user store. A registration is
/// returned through `farm_to_register` and applied by the caller.
#[derive(Debug)]
pub struct CommandResult {
    /// Markdown-formatted response message
    pub response: String,
    /// Farm id to register for the chat
    pub farm_to_register: Option<String>,
}

/// Errors that can occur during command parsing.
#[derive(Debug)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command syntax with error message
    InvalidCommand(String),
}
