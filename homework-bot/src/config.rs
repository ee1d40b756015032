//! Bot configuration
//!
//! Defines the credentials and tunables of the bot: API tokens, the
//! target chat, endpoint URLs and the polling cadence.

use std::time::Duration;

/// Default grading API endpoint
pub const DEFAULT_PRACTICUM_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Bot configuration
///
/// Built once at startup and handed to the poller; never mutated afterwards.
#[derive(Clone)]
pub struct Config {
    /// OAuth token for the grading API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives notifications
    pub chat_id: String,

    /// Grading API homework statuses endpoint
    pub practicum_endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Pause between two polls, whatever the outcome of the first
    pub retry_period: Duration,

    /// Timeout of a single HTTP request
    pub request_timeout: Duration,

    /// Initial cursor; `None` means "now"
    pub from_date: Option<i64>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(practicum_token: String, telegram_token: String, chat_id: String) -> Self {
        Self {
            practicum_token,
            telegram_token,
            chat_id,
            practicum_endpoint: DEFAULT_PRACTICUM_ENDPOINT.to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            retry_period: Duration::from_secs(600),
            request_timeout: Duration::from_secs(30),
            from_date: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PRACTICUM_TOKEN (required)
    /// - TELEGRAM_TOKEN (required)
    /// - CHAT_ID (required)
    /// - PRACTICUM_ENDPOINT (optional, default: Practicum production API)
    /// - TELEGRAM_API_URL (optional, default: https://api.telegram.org)
    /// - RETRY_PERIOD (optional, seconds, default: 600)
    /// - REQUEST_TIMEOUT (optional, seconds, default: 30)
    /// - FROM_DATE (optional, Unix timestamp, default: now)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable source
    ///
    /// All missing required variables are reported at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "CHAT_ID"];
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|&key| lookup(key).is_none())
            .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let var = |key: &str| lookup(key).unwrap_or_default();
        let mut config = Self::new(var("PRACTICUM_TOKEN"), var("TELEGRAM_TOKEN"), var("CHAT_ID"));

        if let Some(endpoint) = lookup("PRACTICUM_ENDPOINT") {
            config.practicum_endpoint = endpoint;
        }

        if let Some(url) = lookup("TELEGRAM_API_URL") {
            config.telegram_api_url = url;
        }

        if let Some(secs) = lookup("RETRY_PERIOD") {
            let secs = secs
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("RETRY_PERIOD must be a number of seconds"))?;
            config.retry_period = Duration::from_secs(secs);
        }

        if let Some(secs) = lookup("REQUEST_TIMEOUT") {
            let secs = secs
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT must be a number of seconds"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(from_date) = lookup("FROM_DATE") {
            let from_date = from_date
                .parse::<i64>()
                .map_err(|_| anyhow::anyhow!("FROM_DATE must be a Unix timestamp"))?;
            config.from_date = Some(from_date);
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.practicum_token.is_empty() {
            anyhow::bail!("practicum_token cannot be empty");
        }

        if self.telegram_token.is_empty() {
            anyhow::bail!("telegram_token cannot be empty");
        }

        if self.chat_id.is_empty() {
            anyhow::bail!("chat_id cannot be empty");
        }

        for (name, url) in [
            ("practicum_endpoint", &self.practicum_endpoint),
            ("telegram_api_url", &self.telegram_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.retry_period.is_zero() {
            anyhow::bail!("retry_period must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("practicum_endpoint", &self.practicum_endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period", &self.retry_period)
            .field("request_timeout", &self.request_timeout)
            .field("from_date", &self.from_date)
            .finish()
    }
}
