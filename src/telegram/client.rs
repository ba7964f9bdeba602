//! HTTP client for the Telegram Bot API.
//!
//! This module provides the [`TelegramClient`] that long-polls inbound
//! messages and delivers outbound ones.

use std::time::Duration;

use log::{debug, error, info, warn};
use reqwest::{Client, Response};

use crate::telegram::{
    IncomingMessage, MessageSink,
    response_structs::{SendMessageBody, Update, UpdatesResponse},
    session::UpdateSession,
};

/// Timeout of a single `sendMessage` call.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram Bot API client.
///
/// # Examples
///
/// ```no_run
/// let client = TelegramClient::new("https://api.telegram.org", "123:abc", 25)?;
/// let mut session = UpdateSession::default();
/// client.skip_backlog(&mut session).await;
///
/// for message in client.get_updates(&mut session).await {
///     client.deliver(&message.chat_id, "pong").await;
/// }
/// ```
pub struct TelegramClient {
    /// Bot API url, token included
    bot_url: String,
    /// Long-poll duration of `getUpdates`, in seconds
    poll_timeout: u64,
    /// HTTP client
    client: Client,
}

impl TelegramClient {
    /// Create a new [TelegramClient].
    ///
    /// # Arguments
    ///
    /// * `url` - Base url of the Bot API
    /// * `token` - Bot token
    /// * `poll_timeout` - Long-poll duration of `getUpdates`, in seconds
    pub fn new(url: &str, token: &str, poll_timeout: u64) -> Result<Self, reqwest::Error> {
        // The HTTP timeout must outlast the long poll
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout + 5))
            .build()?;

        Ok(TelegramClient {
            bot_url: format!("{}/bot{}", url, token),
            poll_timeout,
            client,
        })
    }

    /// Calls `getUpdates`. Errors carry no url, the bot url embeds the token.
    async fn fetch_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>, reqwest::Error> {
        let mut query = vec![("timeout", timeout.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response: UpdatesResponse = self
            .client
            .get(format!("{}/getUpdates", self.bot_url))
            .query(&query)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !response.ok {
            warn!("telegram answered getUpdates with ok=false");
        }

        Ok(response.result)
    }

    /// Long-polls the next inbound text messages.
    ///
    /// The session cursor is advanced past every returned update, including the
    /// ones without text. On failure, the error is logged and no message is
    /// returned; the same updates are fetched again on the next call.
    pub async fn get_updates(&self, session: &mut UpdateSession) -> Vec<IncomingMessage> {
        let updates = match self.fetch_updates(session.offset(), self.poll_timeout).await {
            Ok(updates) => updates,
            Err(e) => {
                error!("failed to get telegram updates: {}", e);
                return vec![];
            }
        };

        let mut messages = vec![];
        for update in updates {
            session.advance(update.update_id);

            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text else {
                continue;
            };

            debug!("update {} from {}: {}", update.update_id, message.chat.id, text);
            messages.push(IncomingMessage {
                update_id: update.update_id,
                chat_id: message.chat.id.to_string(),
                text: text.trim().to_owned(),
            });
        }

        messages
    }

    /// Moves the cursor to the newest pending update without handling it.
    pub async fn skip_backlog(&self, session: &mut UpdateSession) {
        match self.fetch_updates(None, 0).await {
            Ok(updates) => {
                if let Some(last) = updates.last() {
                    session.advance(last.update_id);
                    info!("skipped pending updates up to {}", last.update_id);
                }
            }
            Err(e) => error!("failed to skip pending telegram updates: {}", e),
        }
    }

    /// Calls `sendMessage`. Errors carry no url, the bot url embeds the token.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), reqwest::Error> {
        let body = SendMessageBody {
            chat_id,
            text,
            parse_mode: "Markdown",
        };

        self.client
            .post(format!("{}/sendMessage", self.bot_url))
            .timeout(SEND_TIMEOUT)
            .json(&body)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map(|_| ())
            .map_err(reqwest::Error::without_url)
    }
}

impl MessageSink for TelegramClient {
    async fn deliver(&self, chat_id: &str, text: &str) -> bool {
        match self.send_message(chat_id, text).await {
            Ok(_) => {
                debug!("message delivered to {}", chat_id);
                true
            }
            Err(e) => {
                error!("failed to deliver message to {}: {}", chat_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn create_client(url: &str) -> TelegramClient {
        TelegramClient::new(url, "123:abc", 0).unwrap()
    }

    #[tokio::test]
    async fn test_deliver() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bot123:abc/sendMessage")
            .match_body(Matcher::Json(json!({
                "chat_id": "1234",
                "text": "*hello*",
                "parse_mode": "Markdown"
            })))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let client = create_client(&server.url());

        assert!(client.deliver("1234", "*hello*").await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_deliver_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(400)
            .with_body(r#"{"ok": false, "description": "chat not found"}"#)
            .create_async()
            .await;

        let client = create_client(&server.url());

        assert!(!client.deliver("1234", "hello").await);
    }

    #[tokio::test]
    async fn test_send_message_error_hides_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/bot123:abc/sendMessage")
            .with_status(403)
            .create_async()
            .await;

        let client = create_client(&server.url());
        let error = client.send_message("1234", "hello").await.unwrap_err();

        assert!(error.url().is_none());
        assert!(!error.to_string().contains("123:abc"));
    }

    #[tokio::test]
    async fn test_fetch_updates_error_hides_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bot123:abc/getUpdates")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let client = create_client(&server.url());
        let status_error = client.fetch_updates(None, 0).await.unwrap_err();

        assert!(status_error.url().is_none());
        assert!(!status_error.to_string().contains("123:abc"));
    }

    #[tokio::test]
    async fn test_fetch_updates_decode_error_hides_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bot123:abc/getUpdates")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = create_client(&server.url());
        let decode_error = client.fetch_updates(None, 0).await.unwrap_err();

        assert!(decode_error.url().is_none());
        assert!(!decode_error.to_string().contains("123:abc"));
    }

    #[tokio::test]
    async fn test_get_updates() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "ok": true,
            "result": [
                {"update_id": 42, "message": {"chat": {"id": 1234}, "text": " /crops "}},
                {"update_id": 43, "callback_query": {}},
                {"update_id": 44, "message": {"chat": {"id": 99}, "text": "/help"}}
            ]
        });
        let mock = server
            .mock("GET", "/bot123:abc/getUpdates")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("offset".into(), "42".into()),
                Matcher::UrlEncoded("timeout".into(), "0".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = create_client(&server.url());
        let mut session = UpdateSession::new(Some(41));
        let messages = client.get_updates(&mut session).await;

        mock.assert_async().await;
        assert_eq!(session.cursor(), Some(44));
        assert_eq!(
            messages,
            vec![
                IncomingMessage {
                    update_id: 42,
                    chat_id: "1234".to_owned(),
                    text: "/crops".to_owned(),
                },
                IncomingMessage {
                    update_id: 44,
                    chat_id: "99".to_owned(),
                    text: "/help".to_owned(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_get_updates_failure_keeps_cursor() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bot123:abc/getUpdates")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let client = create_client(&server.url());
        let mut session = UpdateSession::new(Some(7));

        assert!(client.get_updates(&mut session).await.is_empty());
        assert_eq!(session.cursor(), Some(7));
    }

    #[tokio::test]
    async fn test_skip_backlog() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bot123:abc/getUpdates")
            .match_query(Matcher::UrlEncoded("timeout".into(), "0".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": [{"update_id": 5}, {"update_id": 9}]}"#)
            .create_async()
            .await;

        let client = create_client(&server.url());
        let mut session = UpdateSession::default();
        client.skip_backlog(&mut session).await;

        assert_eq!(session.cursor(), Some(9));
        assert_eq!(session.offset(), Some(10));
    }
}
