//! Blockable commands.
//!
//! A blockable is anything the dispatcher can invoke: it declares triggers,
//! may refuse to run for a [`BlockReason`], and executes with the parsed
//! argument body.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::chat::Chat;
use super::message::InboundMessage;
use super::trigger::CommandTrigger;
use crate::i18n::{get_list, get_text};

/// Stable command identity, used for cooldown keys and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(&'static str);

impl CommandId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Why a command refused to run. An expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// The user ran the command too recently in this conversation.
    Cooldown,
    /// A command-specific predicate failed (permissions, wrong context).
    Other,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cooldown => f.write_str("cooldown"),
            Self::Other => f.write_str("other"),
        }
    }
}

/// Command metadata shown by help listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    /// Every keyword announced for the command, `name` first.
    pub aliases: Vec<String>,
    pub usage: String,
    pub category: String,
    pub description: String,
    /// Minimum interval between two runs by one user in one conversation.
    pub cooldown: Duration,
}

impl CommandInfo {
    /// Build metadata from the `commands.<id>` i18n entry.
    pub fn localized(lang: &str, id: CommandId, cooldown: Duration) -> Self {
        let key = |field: &str| format!("commands.{}.{}", id, field);

        let aliases = get_list(lang, &key("triggers"));
        let name = aliases
            .first()
            .cloned()
            .unwrap_or_else(|| id.as_str().to_string());

        Self {
            name,
            aliases,
            usage: get_text(lang, &key("usage")),
            category: get_text(lang, &key("category")),
            description: get_text(lang, &key("description")),
            cooldown,
        }
    }

    /// One trigger per announced alias.
    pub fn triggers(&self) -> Vec<CommandTrigger> {
        self.aliases.iter().map(|a| CommandTrigger::new(a.as_str())).collect()
    }
}

/// Argument body of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandArgs<'a> {
    raw: &'a str,
}

impl<'a> CommandArgs<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Body exactly as it followed the trigger.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn trimmed(&self) -> &'a str {
        self.raw.trim()
    }

    /// Whitespace-separated words of the body.
    pub fn split(&self) -> impl Iterator<Item = &'a str> {
        self.raw.split_whitespace()
    }

    pub fn first(&self) -> Option<&'a str> {
        self.split().next()
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }
}

/// A dispatchable, blockable unit.
#[async_trait]
pub trait Blockable: Send + Sync {
    fn id(&self) -> CommandId;

    fn info(&self) -> &CommandInfo;

    /// Triggers in declaration order. Must not be empty.
    fn triggers(&self) -> &[CommandTrigger];

    /// Command-specific predicates, evaluated after the cooldown.
    ///
    /// `strict` is false for dry runs; implementations must stay free of
    /// side effects either way.
    async fn check(&self, _chat: &Chat, _msg: &InboundMessage, _strict: bool) -> Option<BlockReason> {
        None
    }

    /// Whether this command may run for `msg` right now.
    ///
    /// Cooldown first, then [`check`](Self::check). Never writes the ledger.
    async fn is_blocked(&self, chat: &Chat, msg: &InboundMessage, strict: bool) -> Option<BlockReason> {
        if !chat.time_till_cooldown_end(msg, self.id()).is_zero() {
            return Some(BlockReason::Cooldown);
        }
        self.check(chat, msg, strict).await
    }

    /// Reason-specific notification. The cooldown notice itself is sent by
    /// the chat before this is called.
    async fn on_blocked(&self, _chat: &Chat, _msg: &InboundMessage, _reason: BlockReason) -> anyhow::Result<()> {
        Ok(())
    }

    async fn execute(&self, chat: &Chat, msg: &InboundMessage, args: CommandArgs<'_>) -> anyhow::Result<()>;
}

impl fmt::Debug for dyn Blockable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blockable")
            .field("id", &self.id())
            .field("triggers", &self.triggers())
            .finish()
    }
}

/// Produces a fresh command set for a language.
pub trait CommandCatalog: Send + Sync {
    fn commands(&self, lang: &str) -> Vec<Arc<dyn Blockable>>;
}

impl<F> CommandCatalog for F
where
    F: Fn(&str) -> Vec<Arc<dyn Blockable>> + Send + Sync,
{
    fn commands(&self, lang: &str) -> Vec<Arc<dyn Blockable>> {
        self(lang)
    }
}
