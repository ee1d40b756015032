//! Telegram Bot API client

use homework_core::dto::telegram::{SendMessage, TelegramReply};
use reqwest::Client;
use tracing::debug;

use crate::error::{ClientError, Result};

/// HTTP client for the Telegram Bot API
///
/// The bot token is part of every request URL, so transport errors are
/// stripped of their URL before they leave this client.
#[derive(Clone)]
pub struct TelegramClient {
    /// Base URL of the Bot API (e.g., "https://api.telegram.org")
    api_url: String,
    /// Bot token issued by BotFather
    token: String,
    /// HTTP client instance
    client: Client,
}

impl TelegramClient {
    /// Create a new Bot API client
    ///
    /// # Arguments
    /// * `api_url` - Base URL of the Bot API
    /// * `token` - Bot token
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(api_url, token, Client::new())
    }

    /// Create a new Bot API client with a custom HTTP client
    pub fn with_client(api_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Post a text message to a chat
    ///
    /// # Arguments
    /// * `chat_id` - Target chat identifier
    /// * `text` - Message text
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);

        let response = self
            .client
            .post(&url)
            .json(&SendMessage {
                chat_id: chat_id.to_string(),
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::RequestFailed(e.without_url()))?;

        match serde_json::from_str::<TelegramReply>(&body) {
            Ok(reply) if reply.ok && status.is_success() => {
                debug!("Telegram accepted message for chat {}", chat_id);
                Ok(())
            }
            Ok(reply) => Err(ClientError::api_error(
                reply.error_code.unwrap_or(status.as_u16()),
                reply.description.unwrap_or(body),
            )),
            Err(_) if !status.is_success() => Err(ClientError::api_error(status.as_u16(), body)),
            Err(e) => Err(ClientError::ParseError(format!(
                "Failed to parse Telegram reply: {}",
                e
            ))),
        }
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}
