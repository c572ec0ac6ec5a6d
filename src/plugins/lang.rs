//! Language command.
//!
//! Shows the available languages or switches the chat to one of them.
//! Switching re-registers every command in the new language, so localized
//! triggers change with it. Admin only in groups.

use std::time::Duration;

use async_trait::async_trait;

use super::{Localized, deny, require_admin};
use crate::dispatch::{
    BlockReason, Blockable, Chat, CommandArgs, CommandId, CommandInfo, CommandTrigger, DispatchError,
    InboundMessage, Reply,
};
use crate::i18n;

pub struct Lang {
    meta: Localized,
}

impl Lang {
    pub const ID: CommandId = CommandId::new("lang");

    pub fn new(lang: &str) -> Self {
        Self {
            meta: Localized::new(lang, Self::ID, Duration::from_secs(10)),
        }
    }
}

#[async_trait]
impl Blockable for Lang {
    fn id(&self) -> CommandId {
        Self::ID
    }

    fn info(&self) -> &CommandInfo {
        &self.meta.info
    }

    fn triggers(&self) -> &[CommandTrigger] {
        &self.meta.triggers
    }

    async fn check(&self, chat: &Chat, msg: &InboundMessage, _strict: bool) -> Option<BlockReason> {
        require_admin(chat, msg).await
    }

    async fn on_blocked(&self, chat: &Chat, msg: &InboundMessage, reason: BlockReason) -> anyhow::Result<()> {
        if reason == BlockReason::Other {
            deny(chat, msg, Self::ID).await?;
        }
        Ok(())
    }

    async fn execute(&self, chat: &Chat, msg: &InboundMessage, args: CommandArgs<'_>) -> anyhow::Result<()> {
        let languages = i18n::languages().join(", ");

        let Some(code) = args.first() else {
            let text = chat
                .text("commands.lang.execution.current")
                .replace("{lang}", &chat.language())
                .replace("{languages}", &languages);
            return chat.reply(msg, Reply::text(text)).await;
        };

        let code = code.to_lowercase();
        let text = match chat.update_language(&code).await {
            // Answer in the language just selected.
            Ok(()) => chat.text("commands.lang.execution.changed"),
            Err(DispatchError::UnknownLanguage(_)) => chat
                .text("commands.lang.execution.unknown")
                .replace("{lang}", &code)
                .replace("{languages}", &languages),
            Err(e) => return Err(e.into()),
        };

        chat.reply(msg, Reply::text(text)).await
    }
}
