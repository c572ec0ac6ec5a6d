//! Chatter bot binary.
//!
//! Wires the dispatch engine to Telegram and runs it until Ctrl+C.

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chatter::bot::{self, AppState, TelegramReplier};
use chatter::config::Config;
use chatter::database::{ChatStore, Database, MemoryChatStore, MongoChatStore, UserRepo};
use chatter::dispatch::{ChatRegistry, Services};
use chatter::i18n;
use chatter::permissions::TelegramPermissions;
use chatter::plugins::{BuiltinCatalog, Donate};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chatter=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting chatter...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    info!("Loaded {} languages", i18n::init());

    let chats: Arc<dyn ChatStore> = match &config.mongodb_uri {
        Some(uri) => {
            info!("Connecting to MongoDB...");
            let db = Database::connect(uri, &config.mongodb_database).await?;
            Arc::new(MongoChatStore::new(&db))
        }
        None => {
            warn!("MONGODB_URI not set, chat settings will not survive a restart");
            Arc::new(MemoryChatStore::new())
        }
    };

    // Throttle respects Telegram's rate limits:
    // - 30 messages per second globally
    // - 1 message per second to the same chat
    // - 20 messages per minute to the same group
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    if config.owner_ids.is_empty() {
        info!("No owner IDs configured (OWNER_IDS is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }

    let services = Arc::new(Services {
        replier: Arc::new(TelegramReplier::new(bot.clone())),
        users: Arc::new(UserRepo::new()),
        chats,
        permissions: Arc::new(TelegramPermissions::with_owners(
            bot.inner().clone(),
            config.owner_ids.clone(),
        )),
        catalog: Arc::new(BuiltinCatalog::new(config.donate_url.clone())),
        cooldown_cta: Some(Donate::ID),
    });

    let registry = Arc::new(ChatRegistry::new(services, config.chat_defaults()));
    let state = AppState::new(registry, me.id);

    let dispatcher = bot::build_dispatcher(bot.clone(), state);
    bot::run(&config, bot, dispatcher).await?;

    info!("Shut down");
    Ok(())
}
