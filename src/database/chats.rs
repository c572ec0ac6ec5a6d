//! Chat config storage.
//!
//! `MongoChatStore` is cache-first: reads hit the Moka cache before MongoDB,
//! writes go to MongoDB and then refresh the cache.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::doc;
use mongodb::Collection;
use tracing::debug;

use super::models::ChatConfig;
use super::Database;
use crate::cache::{CacheConfig, TypedCache};
use crate::dispatch::ChatId;

/// Persistence seam for chat configs.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Load a config. `None` for a conversation never saved.
    async fn load(&self, chat_id: ChatId) -> Result<Option<ChatConfig>>;

    /// Insert or replace a config.
    async fn save(&self, config: &ChatConfig) -> Result<()>;
}

/// MongoDB-backed store with a read-through cache.
pub struct MongoChatStore {
    collection: Collection<ChatConfig>,
    cache: TypedCache<ChatId, ChatConfig>,
}

impl MongoChatStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("chats"),
            cache: TypedCache::new("chat_configs", CacheConfig::chat_configs()),
        }
    }
}

#[async_trait]
impl ChatStore for MongoChatStore {
    async fn load(&self, chat_id: ChatId) -> Result<Option<ChatConfig>> {
        if let Some(config) = self.cache.get(&chat_id) {
            return Ok(Some(config));
        }

        let filter = doc! { "chat_id": chat_id };
        let result = self.collection.find_one(filter).await?;
        debug!("DB load chat config for {}: {:?}", chat_id, result.is_some());

        if let Some(config) = &result {
            self.cache.insert(chat_id, config.clone());
        }

        Ok(result)
    }

    async fn save(&self, config: &ChatConfig) -> Result<()> {
        let filter = doc! { "chat_id": config.chat_id };
        let options = mongodb::options::ReplaceOptions::builder()
            .upsert(true)
            .build();

        self.collection
            .replace_one(filter, config)
            .with_options(options)
            .await?;

        self.cache.insert(config.chat_id, config.clone());
        debug!("Saved chat config for {}", config.chat_id);
        Ok(())
    }
}

/// Process-local store, used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryChatStore {
    configs: DashMap<ChatId, ChatConfig>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn load(&self, chat_id: ChatId) -> Result<Option<ChatConfig>> {
        Ok(self.configs.get(&chat_id).map(|c| c.clone()))
    }

    async fn save(&self, config: &ChatConfig) -> Result<()> {
        self.configs.insert(config.chat_id, config.clone());
        Ok(())
    }
}
