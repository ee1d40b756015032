//! Telegram Bot API DTOs

use serde::{Deserialize, Serialize};

/// Body of a `sendMessage` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub text: String,
}

/// Envelope every Bot API method replies with
///
/// `ok` is false when Telegram rejected the call; `description` then
/// explains why (e.g. "Bad Request: chat not found").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramReply {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}
