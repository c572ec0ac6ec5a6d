//! Test doubles for the dispatch engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::blockable::{BlockReason, Blockable, CommandArgs, CommandCatalog, CommandId, CommandInfo};
use super::chat::Chat;
use super::message::{ChatId, InboundMessage};
use super::registry::{ChatDefaults, ChatRegistry};
use super::reply::{Reply, ReplySender};
use super::trigger::CommandTrigger;
use super::Services;
use crate::database::{ChatConfig, MemoryChatStore, UserRepo};
use crate::permissions::OwnerOnly;

/// Records every reply instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingReplier {
    sent: Mutex<Vec<(ChatId, Reply)>>,
    offline: AtomicBool,
}

impl RecordingReplier {
    /// Make every later send fail as if the transport were down.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.sent.lock().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, r)| r.text.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl ReplySender for RecordingReplier {
    async fn send(&self, to: &InboundMessage, reply: Reply) -> anyhow::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            anyhow::bail!("network down");
        }
        self.sent.lock().push((to.chat_id, reply));
        Ok(())
    }
}

/// Configurable command that counts what happens to it.
pub struct TestCommand {
    id: CommandId,
    info: CommandInfo,
    triggers: Vec<CommandTrigger>,
    deny: bool,
    fail: bool,
    reply: Option<String>,
    runs: AtomicUsize,
    bodies: Mutex<Vec<String>>,
    blocked: Mutex<Vec<BlockReason>>,
    checks: Mutex<Vec<bool>>,
}

impl TestCommand {
    /// A command triggered by its own id, without cooldown.
    pub fn new(id: &'static str) -> Self {
        Self {
            id: CommandId::new(id),
            info: CommandInfo {
                name: id.to_string(),
                aliases: vec![id.to_string()],
                category: "Test".to_string(),
                ..Default::default()
            },
            triggers: vec![CommandTrigger::new(id)],
            deny: false,
            fail: false,
            reply: None,
            runs: AtomicUsize::new(0),
            bodies: Mutex::new(Vec::new()),
            blocked: Mutex::new(Vec::new()),
            checks: Mutex::new(Vec::new()),
        }
    }

    pub fn with_triggers(mut self, triggers: &[&str]) -> Self {
        self.triggers = triggers.iter().map(|t| CommandTrigger::new(*t)).collect();
        self.info.aliases = triggers.iter().map(|t| t.to_string()).collect();
        self.info.name = self.info.aliases[0].clone();
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.info.cooldown = cooldown;
        self
    }

    /// `check` always answers `Other`.
    pub fn denied(mut self) -> Self {
        self.deny = true;
        self
    }

    /// `execute` always fails.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// `execute` replies with `text`.
    pub fn replying(mut self, text: &str) -> Self {
        self.reply = Some(text.to_string());
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn arc(self) -> Arc<dyn Blockable> {
        Arc::new(self)
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn bodies(&self) -> Vec<String> {
        self.bodies.lock().clone()
    }

    pub fn blocked(&self) -> Vec<BlockReason> {
        self.blocked.lock().clone()
    }

    /// `strict` flag of every `check` call.
    pub fn checks(&self) -> Vec<bool> {
        self.checks.lock().clone()
    }
}

#[async_trait]
impl Blockable for TestCommand {
    fn id(&self) -> CommandId {
        self.id
    }

    fn info(&self) -> &CommandInfo {
        &self.info
    }

    fn triggers(&self) -> &[CommandTrigger] {
        &self.triggers
    }

    async fn check(&self, _chat: &Chat, _msg: &InboundMessage, strict: bool) -> Option<BlockReason> {
        self.checks.lock().push(strict);
        self.deny.then_some(BlockReason::Other)
    }

    async fn on_blocked(&self, _chat: &Chat, _msg: &InboundMessage, reason: BlockReason) -> anyhow::Result<()> {
        self.blocked.lock().push(reason);
        Ok(())
    }

    async fn execute(&self, chat: &Chat, msg: &InboundMessage, args: CommandArgs<'_>) -> anyhow::Result<()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().push(args.raw().to_string());

        if self.fail {
            anyhow::bail!("{} exploded", self.id);
        }
        if let Some(text) = &self.reply {
            chat.reply(msg, Reply::text(text.as_str())).await?;
        }
        Ok(())
    }
}

/// Catalog returning the same commands for every language.
pub struct StaticCatalog(pub Vec<Arc<dyn Blockable>>);

impl CommandCatalog for StaticCatalog {
    fn commands(&self, _lang: &str) -> Vec<Arc<dyn Blockable>> {
        self.0.clone()
    }
}

/// Wired services over in-memory collaborators.
pub struct Harness {
    pub replier: Arc<RecordingReplier>,
    pub store: Arc<MemoryChatStore>,
    pub users: Arc<UserRepo>,
    pub services: Arc<Services>,
}

pub struct HarnessBuilder {
    catalog: Arc<dyn CommandCatalog>,
    admins: Vec<u64>,
    cta: Option<CommandId>,
}

impl HarnessBuilder {
    pub fn admins(mut self, admins: &[u64]) -> Self {
        self.admins = admins.to_vec();
        self
    }

    pub fn cta(mut self, id: CommandId) -> Self {
        self.cta = Some(id);
        self
    }

    pub fn build(self) -> Harness {
        let replier = Arc::new(RecordingReplier::default());
        let store = Arc::new(MemoryChatStore::new());
        let users = Arc::new(UserRepo::new());

        let services = Arc::new(Services {
            replier: replier.clone(),
            users: users.clone(),
            chats: store.clone(),
            permissions: Arc::new(OwnerOnly::new(self.admins)),
            catalog: self.catalog,
            cooldown_cta: self.cta,
        });

        Harness {
            replier,
            store,
            users,
            services,
        }
    }
}

impl Harness {
    pub fn builder(commands: Vec<Arc<dyn Blockable>>) -> HarnessBuilder {
        Self::with_catalog(Arc::new(StaticCatalog(commands)))
    }

    pub fn with_catalog(catalog: Arc<dyn CommandCatalog>) -> HarnessBuilder {
        HarnessBuilder {
            catalog,
            admins: Vec::new(),
            cta: None,
        }
    }

    pub fn new(commands: Vec<Arc<dyn Blockable>>) -> Self {
        Self::builder(commands).build()
    }

    /// A chat with prefix `!` in English.
    pub fn chat(&self, chat_id: ChatId) -> Arc<Chat> {
        Arc::new(Chat::new(ChatConfig::new(chat_id, "!", "en"), self.services.clone()))
    }

    pub fn registry(&self) -> ChatRegistry {
        ChatRegistry::new(self.services.clone(), ChatDefaults::default())
    }
}

/// Erase a shared test command for handler and catalog lists.
pub fn dynamic(command: &Arc<TestCommand>) -> Arc<dyn Blockable> {
    command.clone()
}
