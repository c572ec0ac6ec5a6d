//! Ping command.
//!
//! Replies with how long the message took to reach the bot.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::Localized;
use crate::dispatch::{Blockable, Chat, CommandArgs, CommandId, CommandInfo, CommandTrigger, InboundMessage, Reply};

pub struct Ping {
    meta: Localized,
}

impl Ping {
    pub const ID: CommandId = CommandId::new("ping");

    pub fn new(lang: &str) -> Self {
        Self {
            meta: Localized::new(lang, Self::ID, Duration::from_secs(5)),
        }
    }
}

#[async_trait]
impl Blockable for Ping {
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
        let ms = (Utc::now() - msg.sent_at).num_milliseconds().max(0);

        let text = chat
            .text("commands.ping.execution.pong")
            .replace("{ms}", &ms.to_string());

        chat.reply(msg, Reply::text(text).quoted()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::tests::{GROUP, MEMBER, group_msg, harness};

    #[tokio::test]
    async fn test_ping_replies_pong() {
        let h = harness(None);
        let chat = h.chat(GROUP);

        let mut msg = group_msg(MEMBER, "!ping");
        msg.sent_at = Utc::now() - chrono::Duration::milliseconds(250);
        chat.handle_message(&msg).await.unwrap();

        let replies = h.replier.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].quote);
        assert!(replies[0].text.starts_with("Pong! "), "{}", replies[0].text);
        assert!(replies[0].text.ends_with("ms"));

        let ms: i64 = replies[0]
            .text
            .trim_start_matches("Pong! ")
            .trim_end_matches("ms")
            .parse()
            .unwrap();
        assert!(ms >= 250);
    }
}
