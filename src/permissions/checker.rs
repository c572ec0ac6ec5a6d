//! Permission checker with caching.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId as TgChatId, ChatMemberKind, UserId as TgUserId};
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::dispatch::{ChatId as ConversationId, UserId};

/// Answers "may this user administrate this conversation?".
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    /// Bot owners (from OWNER_IDS) always pass.
    fn is_bot_owner(&self, user_id: UserId) -> bool;

    async fn is_admin(&self, chat_id: ConversationId, user_id: UserId) -> anyhow::Result<bool>;
}

/// Cache key for admin lookups.
type AdminCacheKey = (ConversationId, UserId);

/// Telegram-backed checker. Caches admin status, negatives included.
#[derive(Clone)]
pub struct TelegramPermissions {
    bot: Bot,
    cache: TypedCache<AdminCacheKey, bool>,
    owner_ids: Vec<u64>,
}

impl TelegramPermissions {
    pub fn with_owners(bot: Bot, owner_ids: Vec<u64>) -> Self {
        Self {
            bot,
            cache: TypedCache::new("admin_status", CacheConfig::admin_status()),
            owner_ids,
        }
    }

    async fn fetch_is_admin(&self, chat_id: ConversationId, user_id: UserId) -> anyhow::Result<bool> {
        let member = self
            .bot
            .get_chat_member(TgChatId(chat_id), TgUserId(user_id))
            .await?;

        Ok(matches!(
            member.kind,
            ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_)
        ))
    }
}

#[async_trait]
impl PermissionChecker for TelegramPermissions {
    #[inline]
    fn is_bot_owner(&self, user_id: UserId) -> bool {
        self.owner_ids.contains(&user_id)
    }

    async fn is_admin(&self, chat_id: ConversationId, user_id: UserId) -> anyhow::Result<bool> {
        if self.is_bot_owner(user_id) {
            return Ok(true);
        }

        let key = (chat_id, user_id);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Admin cache hit for user {} in chat {}", user_id, chat_id);
            return Ok(cached);
        }

        debug!("Admin cache miss for user {} in chat {}", user_id, chat_id);
        let is_admin = self.fetch_is_admin(chat_id, user_id).await?;
        self.cache.insert(key, is_admin);

        Ok(is_admin)
    }
}

/// Checker without a transport: only bot owners are admins.
#[derive(Debug, Clone, Default)]
pub struct OwnerOnly {
    owner_ids: Vec<u64>,
}

impl OwnerOnly {
    pub fn new(owner_ids: Vec<u64>) -> Self {
        Self { owner_ids }
    }
}

#[async_trait]
impl PermissionChecker for OwnerOnly {
    fn is_bot_owner(&self, user_id: UserId) -> bool {
        self.owner_ids.contains(&user_id)
    }

    async fn is_admin(&self, _chat_id: ConversationId, user_id: UserId) -> anyhow::Result<bool> {
        Ok(self.is_bot_owner(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_owner_only() {
        let perms = OwnerOnly::new(vec![1, 2]);

        assert!(perms.is_admin(-100, 1).await.unwrap());
        assert!(!perms.is_admin(-100, 3).await.unwrap());
        assert!(perms.is_bot_owner(2));
    }
}
