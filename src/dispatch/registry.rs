//! Chat registry and per-message error boundary.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, error, warn};

use super::Services;
use super::chat::{Chat, Outcome};
use super::message::{ChatId, InboundMessage};
use super::reply::Reply;
use crate::database::ChatConfig;

/// Settings given to conversations seen for the first time.
#[derive(Debug, Clone)]
pub struct ChatDefaults {
    pub prefix: String,
    pub language: String,
}

impl Default for ChatDefaults {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            language: crate::i18n::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Every known conversation, created lazily from stored config.
pub struct ChatRegistry {
    chats: DashMap<ChatId, Arc<Chat>>,
    services: Arc<Services>,
    defaults: ChatDefaults,
}

impl ChatRegistry {
    pub fn new(services: Arc<Services>, defaults: ChatDefaults) -> Self {
        Self {
            chats: DashMap::new(),
            services,
            defaults,
        }
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    /// An already loaded chat.
    pub fn get(&self, chat_id: ChatId) -> Option<Arc<Chat>> {
        self.chats.get(&chat_id).map(|c| c.clone())
    }

    /// Load a chat, reading its stored config on first sight.
    pub async fn get_or_load(&self, chat_id: ChatId) -> anyhow::Result<Arc<Chat>> {
        if let Some(chat) = self.get(chat_id) {
            return Ok(chat);
        }

        let config = match self.services.chats.load(chat_id).await? {
            Some(config) => config,
            None => {
                debug!("New chat {}, using defaults", chat_id);
                ChatConfig::new(chat_id, &self.defaults.prefix, &self.defaults.language)
            }
        };

        // Two first messages may race here; the first insert wins.
        let chat = self
            .chats
            .entry(chat_id)
            .or_insert_with(|| Arc::new(Chat::new(config, self.services.clone())))
            .clone();

        Ok(chat)
    }

    /// Entry point for every inbound message.
    ///
    /// Never fails: a failing command is logged and answered with a generic
    /// error notice, so one bad message cannot stall the rest.
    pub async fn handle_message(&self, msg: InboundMessage) -> Vec<Outcome> {
        if msg.from_me {
            return Vec::new();
        }

        self.services.users.track(msg.sender);

        let result = match self.get_or_load(msg.chat_id).await {
            Ok(chat) => chat.handle_message(&msg).await.map_err(|e| (Some(chat), e)),
            Err(e) => Err((None, e)),
        };

        match result {
            Ok(outcomes) => outcomes,
            Err((chat, e)) => {
                error!("Failed to handle message {} in chat {}: {:#}", msg.message_id, msg.chat_id, e);

                let text = match chat {
                    Some(chat) => chat.text("errors.generic"),
                    None => crate::i18n::get_text(&self.defaults.language, "errors.generic"),
                };

                if let Err(e) = self.services.replier.send(&msg, Reply::text(text).quoted()).await {
                    warn!("Failed to send error notice to chat {}: {}", msg.chat_id, e);
                }
                Vec::new()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
