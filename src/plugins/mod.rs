//! Built-in commands.
//!
//! Add new commands by:
//! 1. Creating a new file in this directory with a type implementing `Blockable`
//! 2. Adding `pub mod your_command;` below
//! 3. Adding it to `BuiltinCatalog::commands()` (order is resolution and help order)
//! 4. Adding its `commands.<id>` entry to every i18n table

pub mod donate;
pub mod help;
pub mod lang;
pub mod ping;
pub mod prefix;

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::dispatch::{
    BlockReason, Blockable, Chat, CommandCatalog, CommandId, CommandInfo, CommandTrigger,
    InboundMessage, Reply,
};

pub use donate::Donate;
pub use help::Help;
pub use lang::Lang;
pub use ping::Ping;
pub use prefix::Prefix;

/// The command set registered for every chat.
#[derive(Debug, Clone, Default)]
pub struct BuiltinCatalog {
    donate_url: Option<String>,
}

impl BuiltinCatalog {
    pub fn new(donate_url: Option<String>) -> Self {
        Self { donate_url }
    }
}

impl CommandCatalog for BuiltinCatalog {
    fn commands(&self, lang: &str) -> Vec<Arc<dyn Blockable>> {
        vec![
            Arc::new(Ping::new(lang)),
            Arc::new(Help::new(lang)),
            Arc::new(Prefix::new(lang)),
            Arc::new(Lang::new(lang)),
            Arc::new(Donate::new(lang, self.donate_url.clone())),
        ]
    }
}

/// Localized metadata and the triggers derived from it.
#[derive(Debug, Clone)]
pub(crate) struct Localized {
    pub info: CommandInfo,
    pub triggers: Vec<CommandTrigger>,
}

impl Localized {
    pub fn new(lang: &str, id: CommandId, cooldown: Duration) -> Self {
        let info = CommandInfo::localized(lang, id, cooldown);
        let triggers = info.triggers();
        Self { info, triggers }
    }
}

/// In groups, only admins pass. Private chats always pass.
pub(crate) async fn require_admin(chat: &Chat, msg: &InboundMessage) -> Option<BlockReason> {
    if !msg.is_group {
        return None;
    }

    match chat.services().permissions.is_admin(chat.id(), msg.sender).await {
        Ok(true) => None,
        Ok(false) => Some(BlockReason::Other),
        Err(e) => {
            warn!("Admin lookup failed for {} in chat {}: {}", msg.sender, chat.id(), e);
            Some(BlockReason::Other)
        }
    }
}

/// Quote the localized no-permission notice of `id`.
pub(crate) async fn deny(chat: &Chat, msg: &InboundMessage, id: CommandId) -> anyhow::Result<()> {
    let text = chat.text(&format!("commands.{}.execution.no_permission", id));
    chat.reply(msg, Reply::text(text).quoted()).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dispatch::testing::Harness;
    use crate::dispatch::ChatId;

    pub const ADMIN: u64 = 1;
    pub const MEMBER: u64 = 2;
    pub const GROUP: ChatId = -1001;

    pub fn harness(donate_url: Option<&str>) -> Harness {
        Harness::with_catalog(Arc::new(BuiltinCatalog::new(donate_url.map(str::to_string))))
            .admins(&[ADMIN])
            .cta(Donate::ID)
            .build()
    }

    pub fn group_msg(sender: u64, text: &str) -> InboundMessage {
        InboundMessage::text(GROUP, sender, text).in_group()
    }

    #[test]
    fn test_catalog_order_and_triggers() {
        let commands = BuiltinCatalog::default().commands("en");
        let ids: Vec<_> = commands.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["ping", "help", "prefix", "lang", "donate"]);

        let help = &commands[1];
        let triggers: Vec<_> = help.triggers().iter().map(|t| t.command()).collect();
        assert_eq!(triggers, vec!["help", "commands"]);
        assert_eq!(help.info().cooldown, Duration::from_secs(10));
    }

    #[test]
    fn test_catalog_is_localized() {
        let commands = BuiltinCatalog::default().commands("id");
        let names: Vec<_> = commands.iter().map(|c| c.info().name.as_str()).collect();
        assert_eq!(names, vec!["ping", "bantuan", "prefiks", "bahasa", "donasi"]);
    }

    #[tokio::test]
    async fn test_admin_gate() {
        let h = harness(None);
        let chat = h.chat(GROUP);

        assert_eq!(require_admin(&chat, &group_msg(MEMBER, "x")).await, Some(BlockReason::Other));
        assert_eq!(require_admin(&chat, &group_msg(ADMIN, "x")).await, None);
        assert_eq!(require_admin(&chat, &InboundMessage::text(GROUP, MEMBER, "x")).await, None);
    }
}
