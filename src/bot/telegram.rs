//! Conversion between Telegram updates and the dispatch engine.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId as TgChatId, FileMeta, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ReplyParameters, UserId,
};

use super::dispatcher::ThrottledBot;
use crate::dispatch::{Attachment, AttachmentKind, InboundMessage, Reply, ReplySender};

/// Convert a Telegram message. `None` for messages without a sender, e.g. channel posts.
pub fn inbound_from(msg: &Message, bot_id: UserId) -> Option<InboundMessage> {
    let from = msg.from.as_ref()?;

    Some(InboundMessage {
        message_id: msg.id.0,
        chat_id: msg.chat.id.0,
        sender: from.id.0,
        text: msg.text().or_else(|| msg.caption()).map(String::from),
        from_me: from.id == bot_id,
        is_group: msg.chat.is_group() || msg.chat.is_supergroup(),
        attachment: attachment_of(msg),
        quoted: msg
            .reply_to_message()
            .and_then(|quoted| inbound_from(quoted, bot_id))
            .map(Box::new),
        sent_at: msg.date,
    })
}

/// Treat a pressed reply button as if its label had been typed.
pub fn inbound_from_callback(q: &CallbackQuery, bot_id: UserId) -> Option<InboundMessage> {
    let data = q.data.as_ref()?;
    let origin = q.message.as_ref()?;
    let chat = origin.chat();

    Some(InboundMessage {
        message_id: origin.id().0,
        chat_id: chat.id.0,
        sender: q.from.id.0,
        text: Some(data.clone()),
        from_me: q.from.id == bot_id,
        is_group: chat.is_group() || chat.is_supergroup(),
        attachment: None,
        quoted: None,
        sent_at: chrono::Utc::now(),
    })
}

fn attachment_of(msg: &Message) -> Option<Attachment> {
    let described = |kind: AttachmentKind, file: &FileMeta| Attachment {
        kind,
        file_id: file.id.clone(),
        size: Some(file.size),
    };

    if let Some(photo) = msg.photo() {
        let largest = photo.iter().max_by_key(|p| p.width * p.height)?;
        Some(described(AttachmentKind::Photo, &largest.file))
    } else if let Some(video) = msg.video() {
        Some(described(AttachmentKind::Video, &video.file))
    } else if let Some(animation) = msg.animation() {
        Some(described(AttachmentKind::Animation, &animation.file))
    } else if let Some(sticker) = msg.sticker() {
        Some(described(AttachmentKind::Sticker, &sticker.file))
    } else {
        msg.document()
            .map(|document| described(AttachmentKind::Document, &document.file))
    }
}

/// Sends engine replies through the rate-limited bot.
#[derive(Clone)]
pub struct TelegramReplier {
    bot: ThrottledBot,
}

impl TelegramReplier {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }
}

/// One button per row; pressing it sends the label back as callback data.
fn keyboard(buttons: &[String]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        buttons
            .iter()
            .map(|label| vec![InlineKeyboardButton::callback(label.clone(), label.clone())]),
    )
}

#[async_trait]
impl ReplySender for TelegramReplier {
    async fn send(&self, to: &InboundMessage, reply: Reply) -> anyhow::Result<()> {
        let mut request = self.bot.send_message(TgChatId(to.chat_id), reply.text);

        if reply.quote {
            request = request.reply_parameters(ReplyParameters::new(MessageId(to.message_id)));
        }
        if !reply.buttons.is_empty() {
            request = request.reply_markup(keyboard(&reply.buttons));
        }

        request.await?;
        Ok(())
    }
}
