//! Update dispatcher setup.
//!
//! Every message and every pressed reply button goes through the chat
//! registry, which runs the command pipeline of the message's chat.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::{DefaultKey, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::UserId;
use tracing::debug;

use super::telegram::{inbound_from, inbound_from_callback};
use crate::dispatch::ChatRegistry;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Per-chat command pipelines.
    pub chats: Arc<ChatRegistry>,

    /// The bot's own user id, to recognize its own messages.
    pub bot_id: UserId,
}

impl AppState {
    pub fn new(chats: Arc<ChatRegistry>, bot_id: UserId) -> Self {
        Self { chats, bot_id }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    let message_handler = Update::filter_message().endpoint(on_message);
    let callback_handler = Update::filter_callback_query().endpoint(on_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}

async fn on_message(msg: Message, state: AppState) -> anyhow::Result<()> {
    match inbound_from(&msg, state.bot_id) {
        Some(inbound) => {
            state.chats.handle_message(inbound).await;
        }
        None => debug!("Skipping message {} without sender", msg.id.0),
    }
    Ok(())
}

async fn on_callback(bot: ThrottledBot, q: CallbackQuery, state: AppState) -> anyhow::Result<()> {
    bot.answer_callback_query(&q.id).await?;

    if let Some(inbound) = inbound_from_callback(&q, state.bot_id) {
        state.chats.handle_message(inbound).await;
    }
    Ok(())
}
