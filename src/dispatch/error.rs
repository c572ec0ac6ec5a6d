//! Dispatch error types.

use thiserror::Error;

use super::blockable::CommandId;

/// Errors raised while (re)building a chat's command set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("trigger '{trigger}' is declared by both '{first}' and '{second}'")]
    DuplicateTrigger {
        trigger: String,
        first: CommandId,
        second: CommandId,
    },

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
}
