//! Database models.

pub mod chat;

pub use chat::ChatConfig;
