//! Donate command.
//!
//! Also the call-to-action offered on cooldown notices.

use std::time::Duration;

use async_trait::async_trait;

use super::Localized;
use crate::dispatch::{Blockable, Chat, CommandArgs, CommandId, CommandInfo, CommandTrigger, InboundMessage, Reply};

pub struct Donate {
    meta: Localized,
    url: Option<String>,
}

impl Donate {
    pub const ID: CommandId = CommandId::new("donate");

    pub fn new(lang: &str, url: Option<String>) -> Self {
        Self {
            meta: Localized::new(lang, Self::ID, Duration::from_secs(5)),
            url,
        }
    }
}

#[async_trait]
impl Blockable for Donate {
    fn id(&self) -> CommandId {
        Self::ID
    }

    fn info(&self) -> &CommandInfo {
        &self.meta.info
    }

    fn triggers(&self) -> &[CommandTrigger] {
        &self.meta.triggers
    }

    async fn execute(&self, chat: &Chat, msg: &InboundMessage, _args: CommandArgs<'_>) -> anyhow::Result<()> {
        let text = match &self.url {
            Some(url) => chat
                .text("commands.donate.execution.message")
                .replace("{url}", url),
            None => chat.text("commands.donate.execution.unavailable"),
        };

        chat.reply(msg, Reply::text(text).quoted()).await
    }
}
