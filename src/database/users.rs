//! User records.
//!
//! A user record owns that user's cooldown ledger. Records live in a Moka
//! cache with a long idle timeout; the ledger goes away with the record.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::dispatch::{ChatId, CommandId, CooldownLedger, UserId};

/// A known user and their cooldowns.
#[derive(Debug)]
pub struct User {
    pub id: UserId,
    pub first_seen: DateTime<Utc>,
    cooldowns: CooldownLedger,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            first_seen: Utc::now(),
            cooldowns: CooldownLedger::new(),
        }
    }

    /// Remaining cooldown of `command` in `chat_id`. Zero when free.
    pub fn time_till_cooldown_end(&self, chat_id: ChatId, command: CommandId) -> Duration {
        self.cooldowns.remaining(chat_id, command)
    }

    /// Stamp "now" as the last use of `command` in `chat_id`.
    pub fn add_cooldown(&self, chat_id: ChatId, command: CommandId, duration: Duration) {
        self.cooldowns.stamp(chat_id, command, duration);
    }

    /// Check-and-stamp in one step. `Err` carries the remaining wait.
    pub fn claim_cooldown(
        &self,
        chat_id: ChatId,
        command: CommandId,
        duration: Duration,
    ) -> Result<(), Duration> {
        self.cooldowns.claim(chat_id, command, duration)
    }
}

/// Repository of user records.
#[derive(Clone)]
pub struct UserRepo {
    cache: TypedCache<UserId, Arc<User>>,
}

impl UserRepo {
    pub fn new() -> Self {
        Self {
            cache: TypedCache::new("users", CacheConfig::users()),
        }
    }

    /// Get a user by ID. `None` for a user never seen.
    pub fn get(&self, user_id: UserId) -> Option<Arc<User>> {
        self.cache.get(&user_id)
    }

    /// Get a user, creating the record on first sight.
    pub fn get_or_create(&self, user_id: UserId) -> Arc<User> {
        self.cache.get_or_insert_with(user_id, || {
            debug!("Tracking new user {}", user_id);
            Arc::new(User::new(user_id))
        })
    }

    /// Make sure the sender of a message has a record.
    pub fn track(&self, user_id: UserId) {
        let user = self.get_or_create(user_id);
        user.cooldowns.prune();
    }
}

impl Default for UserRepo {
    fn default() -> Self {
        Self::new()
    }
}
