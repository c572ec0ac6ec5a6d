//! Per-conversation dispatch.
//!
//! A [`Chat`] owns the handler set for one conversation and runs every
//! inbound message through resolution, blocking and execution.
//!
//! Handler sets are immutable snapshots. Re-registration builds a new set
//! and swaps it in, so an in-flight dispatch never observes a half-built
//! handler. Dispatches for one chat run one at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::Services;
use super::blockable::{BlockReason, Blockable, CommandArgs, CommandId};
use super::error::DispatchError;
use super::handler::{CommandHandler, HandlerKind};
use super::message::{ChatId, InboundMessage};
use super::reply::Reply;
use crate::database::ChatConfig;
use crate::i18n::{self, get_text, plural_form};

type HandlerSet = Arc<Vec<Arc<CommandHandler>>>;

/// Result of dispatching one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Executed(CommandId),
    Blocked(CommandId, BlockReason),
}

/// Answer of a dry run: would the message execute, and what would run.
#[derive(Debug, Clone)]
pub struct Executability {
    /// False when any resolved command is currently blocked, or when the
    /// message is the bot's own.
    pub executable: bool,
    pub commands: Vec<Arc<dyn Blockable>>,
}

/// One conversation's dispatch state.
pub struct Chat {
    id: ChatId,
    config: RwLock<ChatConfig>,
    handlers: RwLock<HandlerSet>,
    registered: AtomicBool,
    /// Serializes handler (re)registration.
    registration: Mutex<()>,
    /// Serializes message dispatch.
    pipeline: Mutex<()>,
    services: Arc<Services>,
}

impl Chat {
    pub fn new(config: ChatConfig, services: Arc<Services>) -> Self {
        Self {
            id: config.chat_id,
            config: RwLock::new(config),
            handlers: RwLock::new(Arc::new(Vec::new())),
            registered: AtomicBool::new(false),
            registration: Mutex::new(()),
            pipeline: Mutex::new(()),
            services,
        }
    }

    pub fn id(&self) -> ChatId {
        self.id
    }

    pub fn prefix(&self) -> String {
        self.config.read().command_prefix.clone()
    }

    pub fn language(&self) -> String {
        self.config.read().language.clone()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Localized text in this chat's language.
    pub fn text(&self, key: &str) -> String {
        get_text(&self.language(), key)
    }

    // --- Registration ---

    /// Populate the command handler once. Later calls are no-ops.
    pub async fn setup_handlers(&self) -> Result<(), DispatchError> {
        if self.registered.load(Ordering::Acquire) {
            return Ok(());
        }

        let _guard = self.registration.lock().await;
        if self.registered.load(Ordering::Acquire) {
            return Ok(());
        }

        self.rebuild_command_handler()?;
        self.registered.store(true, Ordering::Release);
        Ok(())
    }

    /// Rebuild the command set from the catalog, e.g. after a language change.
    pub async fn register_user_commands(&self) -> Result<(), DispatchError> {
        let _guard = self.registration.lock().await;
        self.rebuild_command_handler()?;
        self.registered.store(true, Ordering::Release);
        Ok(())
    }

    /// Replace the command prefix. The old prefix stops matching at once.
    pub async fn update_prefix(&self, prefix: &str) {
        {
            let _guard = self.registration.lock().await;
            self.config.write().command_prefix = prefix.to_string();

            if let Some(current) = self.command_handler() {
                self.swap_command_handler(current.with_prefix(prefix));
            }
        }

        info!("Chat {} prefix set to '{}'", self.id, prefix);
        self.persist().await;
    }

    /// Switch language and re-register commands in it.
    pub async fn update_language(&self, lang: &str) -> Result<(), DispatchError> {
        if !i18n::is_supported(lang) {
            return Err(DispatchError::UnknownLanguage(lang.to_string()));
        }

        {
            let _guard = self.registration.lock().await;
            let previous = std::mem::replace(&mut self.config.write().language, lang.to_string());

            if let Err(e) = self.rebuild_command_handler() {
                self.config.write().language = previous;
                return Err(e);
            }
            self.registered.store(true, Ordering::Release);
        }

        info!("Chat {} language set to '{}'", self.id, lang);
        self.persist().await;
        Ok(())
    }

    /// Append a non-command handler. It survives command re-registration.
    pub fn add_handler(&self, handler: CommandHandler) {
        let mut slot = self.handlers.write();
        let mut next = slot.as_ref().clone();
        next.push(Arc::new(handler));
        *slot = Arc::new(next);
    }

    fn rebuild_command_handler(&self) -> Result<(), DispatchError> {
        let (prefix, lang) = {
            let config = self.config.read();
            (config.command_prefix.clone(), config.language.clone())
        };

        let commands = self.services.catalog.commands(&lang);
        let handler = CommandHandler::new(HandlerKind::Command, prefix, commands)?;

        info!(
            "Registered {} commands for chat {} ({})",
            handler.commands().len(),
            self.id,
            lang
        );
        self.swap_command_handler(handler);
        Ok(())
    }

    fn swap_command_handler(&self, handler: CommandHandler) {
        let mut slot = self.handlers.write();
        let mut next: Vec<Arc<CommandHandler>> = slot
            .iter()
            .filter(|h| h.kind() != HandlerKind::Command)
            .cloned()
            .collect();
        next.insert(0, Arc::new(handler));
        *slot = Arc::new(next);
    }

    async fn persist(&self) {
        let config = {
            let mut config = self.config.write();
            config.updated_at = Utc::now().timestamp();
            config.clone()
        };

        if let Err(e) = self.services.chats.save(&config).await {
            warn!("Failed to persist config for chat {}: {}", self.id, e);
        }
    }

    // --- Lookup ---

    /// Current handler snapshot.
    pub fn handlers(&self) -> HandlerSet {
        self.handlers.read().clone()
    }

    /// The handler holding user commands, once registered.
    pub fn command_handler(&self) -> Option<Arc<CommandHandler>> {
        self.handlers()
            .iter()
            .find(|h| h.kind() == HandlerKind::Command)
            .cloned()
    }

    /// Handlers that want to see `msg`, in order.
    pub fn handlers_for(&self, msg: &InboundMessage) -> Vec<Arc<CommandHandler>> {
        self.handlers()
            .iter()
            .filter(|h| h.appliable(msg))
            .cloned()
            .collect()
    }

    /// Resolve a trigger keyword, with or without the prefix.
    pub fn command_by_trigger(&self, trigger: &str) -> Option<Arc<dyn Blockable>> {
        let handler = self.command_handler()?;

        let text = if trigger.starts_with(handler.prefix()) {
            trigger.to_string()
        } else {
            format!("{}{}", handler.prefix(), trigger)
        };

        handler
            .find_by_content(&text)
            .into_iter()
            .next()
            .map(|found| found.command)
    }

    pub fn command_by_id(&self, id: CommandId) -> Option<Arc<dyn Blockable>> {
        self.command_handler()?.by_id(id)
    }

    /// Remaining cooldown of `command` for the sender of `msg`.
    pub fn time_till_cooldown_end(&self, msg: &InboundMessage, command: CommandId) -> Duration {
        self.services
            .users
            .get(msg.sender)
            .map(|user| user.time_till_cooldown_end(self.id, command))
            .unwrap_or_default()
    }

    pub async fn reply(&self, msg: &InboundMessage, reply: Reply) -> anyhow::Result<()> {
        self.services.replier.send(msg, reply).await
    }

    // --- Dispatch ---

    /// Run `msg` through every applicable handler.
    ///
    /// Each match is blocked or executed independently. Errors from a
    /// command body propagate; the cooldown slot is consumed regardless.
    /// Failures while reporting a block are logged and skipped.
    pub async fn handle_message(&self, msg: &InboundMessage) -> anyhow::Result<Vec<Outcome>> {
        if msg.from_me {
            return Ok(Vec::new());
        }

        let _turn = self.pipeline.lock().await;
        self.setup_handlers().await?;

        let mut outcomes = Vec::new();

        for handler in self.handlers_for(msg) {
            for found in handler.find(msg) {
                let command = found.command;
                let id = command.id();

                let blocked = match command.is_blocked(self, msg, true).await {
                    Some(reason) => Some(reason),
                    None => self
                        .claim_cooldown(msg, command.as_ref())
                        .err()
                        .map(|_| BlockReason::Cooldown),
                };

                if let Some(reason) = blocked {
                    debug!("Command {} blocked for {} in chat {}: {}", id, msg.sender, self.id, reason);
                    if reason == BlockReason::Cooldown {
                        if let Err(e) = self.send_cooldown_notice(msg, id).await {
                            warn!("Failed to send cooldown notice in chat {}: {}", self.id, e);
                        }
                    }
                    if let Err(e) = command.on_blocked(self, msg, reason).await {
                        warn!("Block hook of {} failed in chat {}: {}", id, self.id, e);
                    }
                    outcomes.push(Outcome::Blocked(id, reason));
                    continue;
                }

                debug!("Executing {} for {} in chat {}", id, msg.sender, self.id);
                outcomes.push(Outcome::Executed(id));
                command.execute(self, msg, CommandArgs::new(&found.body)).await?;
            }
        }

        Ok(outcomes)
    }

    /// Dry run of [`handle_message`](Self::handle_message).
    ///
    /// Sends nothing and never touches the cooldown ledger.
    pub async fn is_executable_command(&self, msg: &InboundMessage) -> Executability {
        if msg.from_me {
            return Executability {
                executable: false,
                commands: Vec::new(),
            };
        }

        if let Err(e) = self.setup_handlers().await {
            warn!("Chat {} has no usable handlers: {}", self.id, e);
            return Executability {
                executable: false,
                commands: Vec::new(),
            };
        }

        let mut commands = Vec::new();
        for handler in self.handlers_for(msg) {
            for found in handler.find(msg) {
                if found.command.is_blocked(self, msg, false).await.is_some() {
                    return Executability {
                        executable: false,
                        commands: Vec::new(),
                    };
                }
                commands.push(found.command);
            }
        }

        Executability {
            executable: true,
            commands,
        }
    }

    fn claim_cooldown(&self, msg: &InboundMessage, command: &dyn Blockable) -> Result<(), Duration> {
        let user = self.services.users.get_or_create(msg.sender);
        user.claim_cooldown(self.id, command.id(), command.info().cooldown)
    }

    async fn send_cooldown_notice(&self, msg: &InboundMessage, command: CommandId) -> anyhow::Result<()> {
        let lang = self.language();
        let prefix = self.prefix();
        let remaining = self.time_till_cooldown_end(msg, command).as_secs_f64();
        let seconds = (remaining * 10.0).round() / 10.0;

        let text = get_text(&lang, "cooldown.message")
            .replace("{time}", &format!("{:.1}", seconds))
            .replace("{second}", &plural_form(&lang, "times.second", seconds))
            .replace("{prefix}", &prefix);

        let mut reply = Reply::text(text).quoted();
        if let Some(cta) = self.services.cooldown_cta.and_then(|id| self.command_by_id(id)) {
            reply = reply.button(format!("{}{}", prefix, cta.info().name));
        }

        self.reply(msg, reply).await
    }
}

impl std::fmt::Debug for Chat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chat")
            .field("id", &self.id)
            .field("config", &*self.config.read())
            .field("handlers", &self.handlers().len())
            .finish()
    }
}
