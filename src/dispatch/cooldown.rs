//! Cooldown ledger.
//!
//! Records, per (conversation, command), when a user last ran a command and
//! for how long that run keeps the command locked. One ledger belongs to one
//! user record.

use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;

use super::blockable::CommandId;
use super::message::ChatId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CooldownKey {
    chat_id: ChatId,
    command: CommandId,
}

#[derive(Debug, Clone, Copy)]
struct CooldownStamp {
    used_at: Instant,
    duration: Duration,
}

impl CooldownStamp {
    fn remaining(&self, now: Instant) -> Duration {
        (self.used_at + self.duration).saturating_duration_since(now)
    }
}

/// Last-use timestamps keyed by conversation and command.
///
/// Reads and writes for one key go through the same map shard lock, so a
/// [`claim`](Self::claim) is linearizable with every other operation on
/// that key.
#[derive(Debug, Default)]
pub struct CooldownLedger {
    stamps: DashMap<CooldownKey, CooldownStamp>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before `command` may run again in `chat_id`.
    ///
    /// Zero when no cooldown is active or the command was never used.
    pub fn remaining(&self, chat_id: ChatId, command: CommandId) -> Duration {
        let key = CooldownKey { chat_id, command };
        self.stamps
            .get(&key)
            .map(|stamp| stamp.remaining(Instant::now()))
            .unwrap_or_default()
    }

    /// Stamp "now" as the last use of `command`.
    pub fn stamp(&self, chat_id: ChatId, command: CommandId, duration: Duration) {
        let key = CooldownKey { chat_id, command };
        self.stamps.insert(
            key,
            CooldownStamp {
                used_at: Instant::now(),
                duration,
            },
        );
    }

    /// Atomically check and stamp.
    ///
    /// Stamps and returns `Ok` when no cooldown is active. Otherwise leaves
    /// the ledger untouched and returns the remaining wait.
    pub fn claim(
        &self,
        chat_id: ChatId,
        command: CommandId,
        duration: Duration,
    ) -> Result<(), Duration> {
        let now = Instant::now();
        let stamp = CooldownStamp {
            used_at: now,
            duration,
        };

        match self.stamps.entry(CooldownKey { chat_id, command }) {
            Entry::Occupied(mut entry) => {
                let remaining = entry.get().remaining(now);
                if !remaining.is_zero() {
                    return Err(remaining);
                }
                entry.insert(stamp);
            }
            Entry::Vacant(entry) => {
                entry.insert(stamp);
            }
        }

        Ok(())
    }

    /// Drop stamps whose window has elapsed.
    pub fn prune(&self) {
        let now = Instant::now();
        self.stamps.retain(|_, stamp| !stamp.remaining(now).is_zero());
    }

    /// Number of stamps held, expired ones included.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}
