//! Cache module - typed caches over Moka.
//!
//! Repositories and permission lookups each own a named [`TypedCache`]
//! built from one of the [`CacheConfig`] presets.
//!
//! ```rust,ignore
//! let configs: TypedCache<i64, ChatConfig> =
//!     TypedCache::new("chat_configs", CacheConfig::chat_configs());
//!
//! configs.insert(chat_id, config);
//! let config = configs.get(&chat_id);
//! ```

mod config;
mod typed;

pub use config::CacheConfig;
pub use typed::TypedCache;
