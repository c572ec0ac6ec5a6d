//! Reply payloads and the sending seam.

use async_trait::async_trait;

use super::message::InboundMessage;

/// An outgoing reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Quick-reply buttons. Pressing one sends its label back as a message.
    pub buttons: Vec<String>,
    /// Quote the message being answered.
    pub quote: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn quoted(mut self) -> Self {
        self.quote = true;
        self
    }

    #[must_use]
    pub fn button(mut self, label: impl Into<String>) -> Self {
        self.buttons.push(label.into());
        self
    }
}

/// Sends replies back through the transport.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Reply to `to` in its conversation.
    async fn send(&self, to: &InboundMessage, reply: Reply) -> anyhow::Result<()>;
}
