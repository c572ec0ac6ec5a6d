//! Configuration module for chatter.
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;

use anyhow::{Context, bail};
use serde::Deserialize;
use url::Url;

use crate::dispatch::ChatDefaults;
use crate::i18n;

/// Bot running mode
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

impl FromStr for BotMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "polling" => Ok(Self::Polling),
            "webhook" => Ok(Self::Webhook),
            other => bail!("unknown BOT_MODE '{}', expected 'polling' or 'webhook'", other),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<Url>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Owner user IDs (comma-separated)
    /// These users pass every admin check.
    pub owner_ids: Vec<u64>,

    // MongoDB. Without a URI, chat configs stay in memory.
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,

    // Chats seen for the first time
    pub default_prefix: String,
    pub default_language: String,

    pub donate_url: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = var("BOT_TOKEN").context("BOT_TOKEN must be set")?;

        let bot_mode = match var("BOT_MODE") {
            Some(mode) => mode.parse()?,
            None => BotMode::default(),
        };

        let webhook_url = var("WEBHOOK_URL")
            .map(|raw| Url::parse(&raw).with_context(|| format!("invalid WEBHOOK_URL '{}'", raw)))
            .transpose()?;

        // Validate webhook URL is set if mode is webhook
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            bail!("WEBHOOK_URL must be set when BOT_MODE is webhook");
        }

        let webhook_port = match var("WEBHOOK_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid WEBHOOK_PORT '{}'", raw))?,
            None => 8443,
        };

        // Parse owner IDs
        let owner_ids = var("OWNER_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<u64>().ok())
            .collect();

        let default_language = var("DEFAULT_LANGUAGE").unwrap_or_else(|| i18n::DEFAULT_LANGUAGE.to_string());
        if !i18n::is_supported(&default_language) {
            bail!(
                "DEFAULT_LANGUAGE '{}' is not one of: {}",
                default_language,
                i18n::languages().join(", ")
            );
        }

        Ok(Self {
            bot_token,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: var("WEBHOOK_SECRET"),
            owner_ids,
            mongodb_uri: var("MONGODB_URI"),
            mongodb_database: var("MONGODB_DATABASE").unwrap_or_else(|| "chatter".to_string()),
            default_prefix: var("DEFAULT_PREFIX").unwrap_or_else(|| "!".to_string()),
            default_language,
            donate_url: var("DONATE_URL"),
        })
    }

    /// Settings for conversations seen for the first time.
    pub fn chat_defaults(&self) -> ChatDefaults {
        ChatDefaults {
            prefix: self.default_prefix.clone(),
            language: self.default_language.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("BOT_TOKEN", "123:abc")]).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.bot_mode, BotMode::Polling);
        assert_eq!(config.webhook_port, 8443);
        assert!(config.mongodb_uri.is_none());
        assert_eq!(config.mongodb_database, "chatter");
        assert_eq!(config.default_prefix, "!");
        assert_eq!(config.default_language, "en");
        assert!(config.owner_ids.is_empty());
        assert!(config.donate_url.is_none());
    }

    #[test]
    fn test_full_webhook_config() {
        let config = load(&[
            ("BOT_TOKEN", "123:abc"),
            ("BOT_MODE", "Webhook"),
            ("WEBHOOK_URL", "https://bot.example.org/hook"),
            ("WEBHOOK_PORT", "9000"),
            ("WEBHOOK_SECRET", "s3cret"),
            ("OWNER_IDS", "1, 2,x,3"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("DEFAULT_PREFIX", "/"),
            ("DEFAULT_LANGUAGE", "id"),
        ])
        .unwrap();

        assert_eq!(config.bot_mode, BotMode::Webhook);
        assert_eq!(config.webhook_url.unwrap().host_str(), Some("bot.example.org"));
        assert_eq!(config.webhook_port, 9000);
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.owner_ids, vec![1, 2, 3]);

        let defaults = load(&[("BOT_TOKEN", "t"), ("DEFAULT_PREFIX", "/"), ("DEFAULT_LANGUAGE", "id")])
            .unwrap()
            .chat_defaults();
        assert_eq!(defaults.prefix, "/");
        assert_eq!(defaults.language, "id");
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[]).is_err());
        assert!(load(&[("BOT_TOKEN", "  ")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("BOT_MODE", "carrier-pigeon")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("BOT_MODE", "webhook")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("WEBHOOK_URL", "not a url")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("WEBHOOK_PORT", "70000")]).is_err());

        let err = load(&[("BOT_TOKEN", "t"), ("DEFAULT_LANGUAGE", "fr")]).unwrap_err();
        assert!(err.to_string().contains("en, id"));
    }
}
