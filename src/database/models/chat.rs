//! Conversation configuration.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::dispatch::ChatId;

/// Persisted per-conversation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Telegram chat ID
    pub chat_id: ChatId,

    /// Prefix every user command must start with
    pub command_prefix: String,

    /// Language code used for notices and command names
    pub language: String,

    /// Unix timestamp of creation
    #[serde(default)]
    pub created_at: i64,

    /// Unix timestamp of last change
    #[serde(default)]
    pub updated_at: i64,
}

impl ChatConfig {
    /// Create a fresh config for a newly seen conversation.
    pub fn new(chat_id: ChatId, command_prefix: impl Into<String>, language: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            chat_id,
            command_prefix: command_prefix.into(),
            language: language.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
