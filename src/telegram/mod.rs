//! Telegram Bot API integration.
//!
//! The bot talks to its users through a Telegram bot:
//!
//! - `client` - long polling of `getUpdates` and delivery through `sendMessage`
//! - `session` - the update cursor owned by the bot loop
//! - `response_structs` - Bot API payloads
//!
//! Docs: <https://core.telegram.org/bots/api>

mod client;
mod response_structs;
mod session;

use mockall::automock;

pub use crate::telegram::client::TelegramClient;
pub use crate::telegram::session::UpdateSession;

/// An inbound text message.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    /// Id of the update carrying the message
    pub update_id: i64,
    /// Chat the message was sent in
    pub chat_id: String,
    /// Trimmed message text
    pub text: String,
}

/// Outbound message channel.
///
/// Implemented by [`TelegramClient`]; mocked in tests of the fleet scheduler
/// and of the bot loop.
#[automock]
pub trait MessageSink {
    /// Sends `text` to `chat_id`.
    ///
    /// Returns false when the message could not be delivered. Failures are
    /// logged by the implementation and never retried.
    async fn deliver(&self, chat_id: &str, text: &str) -> bool;
}
