//! Prefix command.
//!
//! Shows or replaces the chat's command prefix. Admin only in groups.

use std::time::Duration;

use async_trait::async_trait;

use super::{Localized, deny, require_admin};
use crate::dispatch::{
    BlockReason, Blockable, Chat, CommandArgs, CommandId, CommandInfo, CommandTrigger, InboundMessage, Reply,
};

/// Longest accepted prefix, in characters.
const MAX_PREFIX_LEN: usize = 3;

pub struct Prefix {
    meta: Localized,
}

impl Prefix {
    pub const ID: CommandId = CommandId::new("prefix");

    pub fn new(lang: &str) -> Self {
        Self {
            meta: Localized::new(lang, Self::ID, Duration::from_secs(10)),
        }
    }
}

fn parse_prefix(args: &CommandArgs<'_>) -> Option<String> {
    let mut words = args.split();
    let prefix = words.next()?;

    if words.next().is_some() || prefix.chars().count() > MAX_PREFIX_LEN {
        return None;
    }
    Some(prefix.to_string())
}

#[async_trait]
impl Blockable for Prefix {
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
        if args.is_empty() {
            let text = chat
                .text("commands.prefix.execution.current")
                .replace("{prefix}", &chat.prefix());
            return chat.reply(msg, Reply::text(text)).await;
        }

        let Some(prefix) = parse_prefix(&args) else {
            let text = chat.text("commands.prefix.execution.invalid");
            return chat.reply(msg, Reply::text(text).quoted()).await;
        };

        chat.update_prefix(&prefix).await;

        let text = chat
            .text("commands.prefix.execution.changed")
            .replace("{prefix}", &prefix);
        chat.reply(msg, Reply::text(text)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Outcome;
    use crate::plugins::tests::{ADMIN, GROUP, MEMBER, group_msg, harness};

    #[tokio::test]
    async fn test_member_is_denied_in_group() {
        let h = harness(None);
        let chat = h.chat(GROUP);

        let outcomes = chat.handle_message(&group_msg(MEMBER, "!prefix /")).await.unwrap();

        assert_eq!(outcomes, vec![Outcome::Blocked(Prefix::ID, BlockReason::Other)]);
        assert_eq!(chat.prefix(), "!");
        assert_eq!(
            h.replier.texts(),
            vec!["Only group admins can change the prefix.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_admin_changes_prefix() {
        let h = harness(None);
        let chat = h.chat(GROUP);

        chat.handle_message(&group_msg(ADMIN, "!prefix /")).await.unwrap();

        assert_eq!(chat.prefix(), "/");
        assert_eq!(
            h.replier.texts(),
            vec!["Prefix changed. Commands now start with /".to_string()]
        );
        assert!(chat.handle_message(&group_msg(MEMBER, "!ping")).await.unwrap().is_empty());
        assert_eq!(chat.handle_message(&group_msg(MEMBER, "/ping")).await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_anyone_in_private_chat() {
        let h = harness(None);
        let chat = h.chat(MEMBER as i64);

        chat.handle_message(&InboundMessage::text(MEMBER as i64, MEMBER, "!prefix"))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;
        chat.handle_message(&InboundMessage::text(MEMBER as i64, MEMBER, "!prefix too long"))
            .await
            .unwrap();

        assert_eq!(
            h.replier.texts(),
            vec![
                "The current prefix is !".to_string(),
                "A prefix must be a single word of at most 3 characters.".to_string(),
            ]
        );
        assert_eq!(chat.prefix(), "!");
    }

    #[test]
    fn test_validation() {
        assert_eq!(parse_prefix(&CommandArgs::new("#")), Some("#".to_string()));
        assert_eq!(parse_prefix(&CommandArgs::new(" >> ")), Some(">>".to_string()));
        assert_eq!(parse_prefix(&CommandArgs::new("abcd")), None);
        assert_eq!(parse_prefix(&CommandArgs::new("a b")), None);
        assert_eq!(parse_prefix(&CommandArgs::new("")), None);
    }
}
