//! Database module exports.

mod chats;
mod models;
mod mongo;
mod users;

pub use chats::{ChatStore, MemoryChatStore, MongoChatStore};
pub use models::ChatConfig;
pub use mongo::Database;
pub use users::{User, UserRepo};
