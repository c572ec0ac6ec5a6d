//! Help command.
//!
//! Without arguments lists every command of the chat, grouped by category in
//! registration order. With an argument explains that one command.

use std::time::Duration;

use async_trait::async_trait;

use super::Localized;
use crate::dispatch::{Blockable, Chat, CommandArgs, CommandId, CommandInfo, CommandTrigger, InboundMessage, Reply};

pub struct Help {
    meta: Localized,
}

impl Help {
    pub const ID: CommandId = CommandId::new("help");

    pub fn new(lang: &str) -> Self {
        Self {
            meta: Localized::new(lang, Self::ID, Duration::from_secs(10)),
        }
    }

    fn listing(chat: &Chat) -> String {
        let prefix = chat.prefix();
        let commands = chat
            .command_handler()
            .map(|h| h.commands().to_vec())
            .unwrap_or_default();

        // Categories keep the order of their first command.
        let mut groups: Vec<(&str, Vec<&CommandInfo>)> = Vec::new();
        for command in &commands {
            let info = command.info();
            match groups.iter_mut().find(|(category, _)| *category == info.category) {
                Some((_, infos)) => infos.push(info),
                None => groups.push((info.category.as_str(), vec![info])),
            }
        }

        let entry = chat.text("commands.help.execution.entry");
        let mut text = chat
            .text("commands.help.execution.header")
            .replace("{prefix}", &prefix);

        for (category, infos) in groups {
            text.push_str("\n\n");
            text.push_str(category);
            for info in infos {
                text.push('\n');
                text.push_str(
                    &entry
                        .replace("{prefix}", &prefix)
                        .replace("{name}", &info.name)
                        .replace("{description}", &info.description),
                );
            }
        }

        text
    }

    fn detail(chat: &Chat, info: &CommandInfo) -> String {
        let prefix = chat.prefix();
        let aliases = info
            .aliases
            .iter()
            .map(|a| format!("{}{}", prefix, a))
            .collect::<Vec<_>>()
            .join(", ");

        chat.text("commands.help.execution.detail")
            .replace("{prefix}", &prefix)
            .replace("{usage}", &info.usage)
            .replace("{description}", &info.description)
            .replace("{aliases}", &aliases)
            .replace("{cooldown}", &info.cooldown.as_secs().to_string())
    }
}

#[async_trait]
impl Blockable for Help {
    fn id(&self) -> CommandId {
        Self::ID
    }

    fn info(&self) -> &CommandInfo {
        &self.meta.info
    }

    fn triggers(&self) -> &[CommandTrigger] {
        &self.meta.triggers
    }

    async fn execute(&self, chat: &Chat, msg: &InboundMessage, args: CommandArgs<'_>) -> anyhow::Result<()> {
        let text = match args.first() {
            None => Self::listing(chat),
            Some(name) => match chat.command_by_trigger(name) {
                Some(command) => Self::detail(chat, command.info()),
                None => chat
                    .text("commands.help.execution.unknown")
                    .replace("{name}", name),
            },
        };

        chat.reply(msg, Reply::text(text)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::tests::{GROUP, MEMBER, group_msg, harness};

    #[tokio::test]
    async fn test_listing_groups_by_category() {
        let h = harness(None);
        let chat = h.chat(GROUP);

        chat.handle_message(&group_msg(MEMBER, "!help")).await.unwrap();

        let text = &h.replier.texts()[0];
        assert!(text.starts_with("Available commands (prefix: !)"), "{}", text);

        let info = text.find("\nInfo\n").unwrap();
        let admin = text.find("\nAdmin\n").unwrap();
        assert!(info < admin);

        let ping = text.find("• !ping - ").unwrap();
        let help = text.find("• !help - ").unwrap();
        let donate = text.find("• !donate - ").unwrap();
        let prefix = text.find("• !prefix - ").unwrap();
        assert!(ping < help && help < donate && donate < admin && admin < prefix);
    }

    #[tokio::test]
    async fn test_detail_resolves_alias() {
        let h = harness(None);
        let chat = h.chat(GROUP);

        chat.handle_message(&group_msg(MEMBER, "!commands lang")).await.unwrap();

        let text = &h.replier.texts()[0];
        assert!(text.starts_with("!lang [code]"), "{}", text);
        assert!(text.contains("Aliases: !lang, !language"));
        assert!(text.contains("Cooldown: 10s"));
    }

    #[tokio::test]
    async fn test_detail_unknown_command() {
        let h = harness(None);
        let chat = h.chat(GROUP);

        chat.handle_message(&group_msg(MEMBER, "!help dance")).await.unwrap();

        assert_eq!(h.replier.texts(), vec!["There is no command called \"dance\".".to_string()]);
    }
}
