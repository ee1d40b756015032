//! Homework Bot
//!
//! Watches the review status of a homework on the grading API and posts
//! every change to a Telegram chat.
//!
//! Architecture:
//! - Configuration: credentials and tunables from the environment (and `.env`)
//! - Repositories: narrow seams over the grading and Telegram HTTP clients
//! - Services: in-memory change and duplicate tracking
//! - Scheduler: the fixed-period polling loop
//!
//! Failures inside the loop are logged every time and reported to the chat
//! once per distinct message; the loop only stops on Ctrl-C.

mod config;
mod repository;
mod scheduler;
mod service;

use anyhow::{Context, Result};
use homework_client::{PracticumClient, TelegramClient};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::{PracticumHomeworkRepository, TelegramNotificationRepository};
use crate::scheduler::StatusPoller;
use crate::service::LoopState;

#[tokio::main]
async fn main() -> Result<()> {
    // Read before logging is set up so RUST_LOG may come from .env
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homework_bot=debug,homework_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to read .env file: {}", e),
    }

    info!("Starting homework bot");

    // Missing credentials are the only fatal error
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("CRITICAL: cannot start without configuration: {:#}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Loaded configuration: chat_id={}, practicum_endpoint={}",
        config.chat_id, config.practicum_endpoint
    );

    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let homeworks = Arc::new(PracticumHomeworkRepository::new(PracticumClient::with_client(
        config.practicum_endpoint.clone(),
        config.practicum_token.clone(),
        http.clone(),
    )));
    let notifier = Arc::new(TelegramNotificationRepository::new(
        TelegramClient::with_client(
            config.telegram_api_url.clone(),
            config.telegram_token.clone(),
            http,
        ),
        config.chat_id.clone(),
    ));

    let cursor = config
        .from_date
        .unwrap_or_else(|| chrono::Utc::now().timestamp());
    let poller = StatusPoller::new(config, homeworks, notifier);

    let state = poller.run(LoopState::new(cursor), shutdown_signal()).await;

    info!(
        "Homework bot stopped (last from_date: {}, failures reported: {})",
        state.cursor(),
        state.notified_error_count()
    );
    if !state.last_status_message().is_empty() {
        debug!("Last announced status: {}", state.last_status_message());
    }

    Ok(())
}

/// Loads and validates configuration from the environment
fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

/// Completes on Ctrl-C
///
/// If the signal handler cannot be installed the bot keeps running until
/// the process is killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
