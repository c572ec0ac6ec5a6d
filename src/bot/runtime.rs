//! Bot runtime - Polling and Webhook runners.

use std::net::SocketAddr;

use anyhow::Context;
use teloxide::dispatching::DefaultKey;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::info;

use super::dispatcher::ThrottledBot;
use crate::config::{BotMode, Config};

type BotDispatcher = Dispatcher<ThrottledBot, anyhow::Error, DefaultKey>;

/// Run the bot with the configured mode until Ctrl+C.
pub async fn run(config: &Config, bot: ThrottledBot, mut dispatcher: BotDispatcher) -> anyhow::Result<()> {
    match config.bot_mode {
        BotMode::Polling => {
            info!("Starting bot in polling mode...");
            dispatcher.dispatch().await;
        }
        BotMode::Webhook => {
            info!("Starting bot in webhook mode...");
            run_webhook(config, bot, dispatcher).await?;
        }
    }
    Ok(())
}

/// Serve updates through teloxide's axum webhook listener.
///
/// `setWebhook` is called on start and `deleteWebhook` on shutdown.
async fn run_webhook(config: &Config, bot: ThrottledBot, mut dispatcher: BotDispatcher) -> anyhow::Result<()> {
    let url = config
        .webhook_url
        .clone()
        .context("WEBHOOK_URL must be set when using webhook mode")?;

    // Listen on all interfaces at the configured port
    let address = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));

    let mut options = Options::new(address, url.clone());
    if let Some(ref secret) = config.webhook_secret {
        options = options.secret_token(secret.clone());
        info!("Webhook secret token configured");
    }

    info!("Setting webhook URL: {}", url);
    info!("Listening on: {}", address);

    // The listener only needs plain API access, not the throttled bot.
    let listener = webhooks::axum(bot.inner().clone(), options)
        .await
        .context("failed to set up webhook")?;

    let error_handler = LoggingErrorHandler::with_custom_text("Error from update listener");
    dispatcher
        .dispatch_with_listener(listener, error_handler)
        .await;

    Ok(())
}
