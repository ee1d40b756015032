//! Notifications repository
//!
//! Delivers text messages to the configured Telegram chat.

use async_trait::async_trait;
use homework_client::{Result, TelegramClient};
use tracing::{debug, info};

/// Repository trait for delivering notifications
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Sends a message to the notification channel
    ///
    /// # Arguments
    /// * `text` - Message text
    async fn send_message(&self, text: &str) -> Result<()>;
}

/// Telegram implementation of NotificationRepository
pub struct TelegramNotificationRepository {
    client: TelegramClient,
    chat_id: String,
}

impl TelegramNotificationRepository {
    /// Creates a new repository posting to `chat_id`
    pub fn new(client: TelegramClient, chat_id: String) -> Self {
        Self { client, chat_id }
    }
}

#[async_trait]
impl NotificationRepository for TelegramNotificationRepository {
    async fn send_message(&self, text: &str) -> Result<()> {
        info!("Sending message to Telegram");
        self.client.send_message(&self.chat_id, text).await?;
        debug!("Message sent: {}", text);
        Ok(())
    }
}
