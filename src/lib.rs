//! Chatter - per-conversation command dispatch for chat bots.
//!
//! Every conversation gets its own prefix, language and command set.
//! Messages are resolved to commands, checked against cooldowns and
//! command predicates, and executed one at a time per conversation.
//!
//! ## Architecture
//!
//! - `dispatch` - Triggers, blockable commands, handlers, the chat pipeline
//! - `config` - Environment configuration
//! - `database` - Chat configs (MongoDB or memory) and user records
//! - `cache` - Typed Moka caches
//! - `permissions` - Admin checking with caching
//! - `i18n` - Embedded translation tables
//! - `plugins` - Built-in commands
//! - `bot` - Telegram transport (with Throttle for API rate limiting)

pub mod bot;
pub mod cache;
pub mod config;
pub mod database;
pub mod dispatch;
pub mod i18n;
pub mod permissions;
pub mod plugins;
