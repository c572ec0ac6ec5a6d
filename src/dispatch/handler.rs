//! Handler resolution.
//!
//! A handler is an immutable, ordered set of commands sharing one prefix.
//! Registration order is resolution priority: the first command whose
//! trigger matches wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::blockable::{Blockable, CommandId};
use super::error::DispatchError;
use super::message::InboundMessage;
use super::trigger::CommandTrigger;

/// What a handler is consulted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// User commands behind the chat's prefix.
    Command,
    /// Non-command triggers, consulted for every message with text.
    Routine,
}

/// A resolved trigger and the command it belongs to.
#[derive(Debug, Clone)]
pub struct Match {
    pub trigger: CommandTrigger,
    pub command: Arc<dyn Blockable>,
    /// Text after prefix, keyword and one separator.
    pub body: String,
}

/// Ordered command registry with a shared prefix.
#[derive(Clone)]
pub struct CommandHandler {
    kind: HandlerKind,
    prefix: String,
    commands: Vec<Arc<dyn Blockable>>,
}

impl CommandHandler {
    /// Build a handler, rejecting trigger collisions between commands.
    pub fn new(
        kind: HandlerKind,
        prefix: impl Into<String>,
        commands: Vec<Arc<dyn Blockable>>,
    ) -> Result<Self, DispatchError> {
        let mut owners: HashMap<&str, CommandId> = HashMap::new();

        for command in &commands {
            for trigger in command.triggers() {
                match owners.insert(trigger.command(), command.id()) {
                    Some(first) if first != command.id() => {
                        return Err(DispatchError::DuplicateTrigger {
                            trigger: trigger.command().to_string(),
                            first,
                            second: command.id(),
                        });
                    }
                    _ => {}
                }
            }
        }

        Ok(Self {
            kind,
            prefix: prefix.into(),
            commands,
        })
    }

    /// Same commands under another prefix.
    #[must_use]
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            prefix: prefix.into(),
            commands: self.commands.clone(),
        }
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Commands in registration order.
    pub fn commands(&self) -> &[Arc<dyn Blockable>] {
        &self.commands
    }

    /// Whether this handler should be consulted for `msg` at all.
    pub fn appliable(&self, msg: &InboundMessage) -> bool {
        let text = msg.content();
        if text.is_empty() {
            return false;
        }
        match self.kind {
            HandlerKind::Command => text.starts_with(self.prefix.as_str()),
            HandlerKind::Routine => true,
        }
    }

    /// Resolve a message against this handler.
    pub fn find(&self, msg: &InboundMessage) -> Vec<Match> {
        self.find_by_content(msg.content())
    }

    /// Resolve raw text. At most one match: the first command, in
    /// registration order, owning a trigger that matches.
    pub fn find_by_content(&self, text: &str) -> Vec<Match> {
        for command in &self.commands {
            for trigger in command.triggers() {
                if let Some(body) = trigger.match_text(&self.prefix, text) {
                    return vec![Match {
                        trigger: trigger.clone(),
                        command: command.clone(),
                        body: body.to_string(),
                    }];
                }
            }
        }
        Vec::new()
    }

    pub fn by_id(&self, id: CommandId) -> Option<Arc<dyn Blockable>> {
        self.commands.iter().find(|c| c.id() == id).cloned()
    }
}

impl fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHandler")
            .field("kind", &self.kind)
            .field("prefix", &self.prefix)
            .field("commands", &self.commands.iter().map(|c| c.id()).collect::<Vec<_>>())
            .finish()
    }
}
