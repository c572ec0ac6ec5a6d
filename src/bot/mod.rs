//! Bot module - Telegram transport for the dispatch engine.

pub mod dispatcher;
mod runtime;
pub mod telegram;

pub use dispatcher::{AppState, ThrottledBot, build_dispatcher};
pub use runtime::run;
pub use telegram::TelegramReplier;
