//! Permission checks used by command predicates.
//!
//! Commands that need elevated rights ask a [`PermissionChecker`] whether
//! the sender is an admin of the conversation and block with
//! `BlockReason::Other` when not.
//!
//! ```rust,ignore
//! if !chat.services().permissions.is_admin(chat.id(), msg.sender).await.unwrap_or(false) {
//!     return Some(BlockReason::Other);
//! }
//! ```

mod checker;

pub use checker::{OwnerOnly, PermissionChecker, TelegramPermissions};
