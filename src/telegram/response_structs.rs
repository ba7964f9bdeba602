//! Internal data structures for Telegram Bot API payloads.
//!
//! Only the fields the bot reads are modeled; everything else is ignored.

use serde::{Deserialize, Serialize};

/// Response of `getUpdates`.
#[derive(Deserialize, Debug, Default)]
pub struct UpdatesResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<Update>,
}

/// One inbound update. Non-message updates (edits, callbacks...) have no
/// `message` but still advance the cursor.
#[derive(Deserialize, Debug)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<MessageDetail>,
}

#[derive(Deserialize, Debug)]
pub struct MessageDetail {
    pub chat: ChatDetail,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatDetail {
    pub id: i64,
}

/// Body of `sendMessage`.
#[derive(Serialize, Debug)]
pub struct SendMessageBody<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'a str,
}
