//! Internationalization (i18n) module.
//!
//! Translations are embedded with `include_str!` and parsed once on first
//! use. Keys use dot notation, e.g. `"commands.help.usage"`. Lookups fall
//! back to English, then to the key itself.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::error;

/// Language used when a chat's language lacks a key.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Global translation store: LangCode -> JSON tree
static TRANSLATIONS: Lazy<HashMap<&'static str, Value>> = Lazy::new(|| {
    let sources = [("en", include_str!("en.json")), ("id", include_str!("id.json"))];

    let mut map = HashMap::new();
    for (lang, source) in sources {
        match serde_json::from_str(source) {
            Ok(val) => {
                map.insert(lang, val);
            }
            Err(e) => error!("Failed to parse translations for '{}': {}", lang, e),
        }
    }
    map
});

/// Parse the embedded tables now instead of on the first message.
pub fn init() -> usize {
    TRANSLATIONS.len()
}

/// Whether `lang` has a translation table.
pub fn is_supported(lang: &str) -> bool {
    TRANSLATIONS.contains_key(lang)
}

/// Supported language codes, sorted.
pub fn languages() -> Vec<&'static str> {
    let mut codes: Vec<_> = TRANSLATIONS.keys().copied().collect();
    codes.sort_unstable();
    codes
}

/// Get text for a key in a specific language.
pub fn get_text(lang: &str, key: &str) -> String {
    lookup(lang, key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

/// Get a list of strings, e.g. command triggers. Empty when missing.
pub fn get_list(lang: &str, key: &str) -> Vec<String> {
    lookup(lang, key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Pick the singular or plural form stored under `key` for `amount`.
pub fn plural_form(lang: &str, key: &str, amount: f64) -> String {
    let forms = get_list(lang, key);
    let index = if amount == 1.0 { 0 } else { 1 };

    forms
        .get(index)
        .or_else(|| forms.first())
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Resolve a key in `lang`, falling back to the default language.
fn lookup(lang: &str, key: &str) -> Option<&'static Value> {
    let found = TRANSLATIONS.get(lang).and_then(|val| resolve_key(val, key));
    if found.is_some() || lang == DEFAULT_LANGUAGE {
        return found;
    }
    TRANSLATIONS
        .get(DEFAULT_LANGUAGE)
        .and_then(|val| resolve_key(val, key))
}

fn resolve_key<'a>(val: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = val;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_load() {
        assert_eq!(init(), 2);
        assert_eq!(languages(), vec!["en", "id"]);
        assert!(is_supported("id"));
        assert!(!is_supported("fr"));
    }

    #[test]
    fn test_get_text_nested() {
        assert_eq!(get_text("en", "commands.ping.usage"), "ping");
        assert_eq!(get_text("id", "language.name"), "Bahasa Indonesia");
    }

    #[test]
    fn test_fallback_to_english_then_key() {
        assert_eq!(get_text("fr", "language.name"), "English");
        assert_eq!(get_text("en", "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_get_list() {
        assert_eq!(get_list("en", "commands.help.triggers"), vec!["help", "commands"]);
        assert_eq!(get_list("id", "commands.help.triggers"), vec!["bantuan", "perintah"]);
        assert!(get_list("en", "commands.help.usage").is_empty());
    }

    #[test]
    fn test_plural_form() {
        assert_eq!(plural_form("en", "times.second", 1.0), "second");
        assert_eq!(plural_form("en", "times.second", 2.5), "seconds");
        assert_eq!(plural_form("en", "times.second", 0.0), "seconds");
        assert_eq!(plural_form("id", "times.second", 1.0), "detik");
        assert_eq!(plural_form("en", "times.minute", 3.0), "times.minute");
    }
}
