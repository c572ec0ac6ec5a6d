//! Transport-neutral inbound message.
//!
//! The transport adapter converts whatever the network delivers into an
//! [`InboundMessage`]; the dispatch engine never sees protocol types.

use chrono::{DateTime, Utc};

/// Conversation identifier (Telegram chat id).
pub type ChatId = i64;

/// User identifier (Telegram user id).
pub type UserId = u64;

/// Kind of media attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Photo,
    Video,
    Animation,
    Sticker,
    Document,
}

/// Media attached to a message. Only a descriptor, the bytes stay remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub file_id: String,
    /// Size in bytes, when the transport reports it.
    pub size: Option<u32>,
}

/// A message as seen by the dispatcher.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub message_id: i32,
    pub chat_id: ChatId,
    pub sender: UserId,
    /// Text content (or media caption).
    pub text: Option<String>,
    /// Sent by the bot itself.
    pub from_me: bool,
    pub is_group: bool,
    pub attachment: Option<Attachment>,
    /// The message this one replies to.
    pub quoted: Option<Box<InboundMessage>>,
    pub sent_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Create a plain text message.
    pub fn text(chat_id: ChatId, sender: UserId, text: impl Into<String>) -> Self {
        Self {
            message_id: 0,
            chat_id,
            sender,
            text: Some(text.into()),
            from_me: false,
            is_group: false,
            attachment: None,
            quoted: None,
            sent_at: Utc::now(),
        }
    }

    /// Text content, empty when the message carries none.
    pub fn content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Attachment on this message, falling back to the quoted one.
    pub fn media(&self) -> Option<&Attachment> {
        self.attachment
            .as_ref()
            .or_else(|| self.quoted.as_ref().and_then(|q| q.attachment.as_ref()))
    }

    #[must_use]
    pub fn from_bot(mut self) -> Self {
        self.from_me = true;
        self
    }

    #[must_use]
    pub fn in_group(mut self) -> Self {
        self.is_group = true;
        self
    }
}
