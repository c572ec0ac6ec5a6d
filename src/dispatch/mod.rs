//! Dispatch engine.
//!
//! Resolves inbound messages to commands, enforces blocking (cooldowns and
//! command predicates) and executes what is allowed to run.
//!
//! ## Flow
//!
//! ```text
//! message -> ChatRegistry -> Chat -> applicable handlers -> matches
//!         -> blocked?  yes: notice + on_blocked
//!                      no:  stamp cooldown, execute
//! ```

pub mod blockable;
pub mod chat;
pub mod cooldown;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod reply;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use blockable::{BlockReason, Blockable, CommandArgs, CommandCatalog, CommandId, CommandInfo};
pub use chat::{Chat, Executability, Outcome};
pub use cooldown::CooldownLedger;
pub use error::DispatchError;
pub use handler::{CommandHandler, HandlerKind, Match};
pub use message::{Attachment, AttachmentKind, ChatId, InboundMessage, UserId};
pub use registry::{ChatDefaults, ChatRegistry};
pub use reply::{Reply, ReplySender};
pub use trigger::CommandTrigger;

use crate::database::{ChatStore, UserRepo};
use crate::permissions::PermissionChecker;

/// Collaborators shared by every chat.
pub struct Services {
    pub replier: Arc<dyn ReplySender>,
    pub users: Arc<UserRepo>,
    pub chats: Arc<dyn ChatStore>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub catalog: Arc<dyn CommandCatalog>,
    /// Command advertised on the cooldown notice.
    pub cooldown_cta: Option<CommandId>,
}
