//! Command triggers.

/// A literal command keyword.
///
/// A trigger matches text that starts with `prefix + command` followed by
/// either the end of the text or one whitespace separator. Matching is
/// exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandTrigger {
    command: String,
}

impl CommandTrigger {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The keyword, without prefix.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Match `text` against this trigger under `prefix`.
    ///
    /// Returns the argument body: everything after the prefix, the keyword
    /// and one separator.
    pub fn match_text<'a>(&self, prefix: &str, text: &'a str) -> Option<&'a str> {
        let rest = text.strip_prefix(prefix)?.strip_prefix(self.command.as_str())?;

        let mut chars = rest.chars();
        match chars.next() {
            None => Some(""),
            Some(c) if c.is_whitespace() => Some(chars.as_str()),
            Some(_) => None,
        }
    }

    /// Whether `text` invokes this trigger under `prefix`.
    pub fn matches(&self, prefix: &str, text: &str) -> bool {
        self.match_text(prefix, text).is_some()
    }
}

impl From<&str> for CommandTrigger {
    fn from(command: &str) -> Self {
        Self::new(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_with_and_without_body() {
        let ping = CommandTrigger::new("ping");

        assert_eq!(ping.match_text("!", "!ping"), Some(""));
        assert_eq!(ping.match_text("!", "!ping now"), Some("now"));
        assert_eq!(ping.match_text("!", "!ping\nsecond line"), Some("second line"));
    }

    #[test]
    fn test_separator_required() {
        let ping = CommandTrigger::new("ping");

        assert!(!ping.matches("!", "!pingx"));
        assert!(!ping.matches("!", "!pin"));
    }

    #[test]
    fn test_prefix_required() {
        let ping = CommandTrigger::new("ping");

        assert!(!ping.matches("!", "ping"));
        assert!(!ping.matches("!", " !ping"));
        assert!(ping.matches("", "ping"));
    }

    #[test]
    fn test_case_sensitive() {
        let ping = CommandTrigger::new("ping");

        assert!(!ping.matches("!", "!PING"));
        assert!(!ping.matches("!", "!Ping"));
    }

    #[test]
    fn test_only_one_separator_consumed() {
        let ping = CommandTrigger::new("ping");

        assert_eq!(ping.match_text("!", "!ping  two"), Some(" two"));
    }

    #[test]
    fn test_multichar_prefix() {
        let ping = CommandTrigger::new("ping");

        assert_eq!(ping.match_text("!!", "!!ping x"), Some("x"));
        assert!(!ping.matches("!!", "!ping"));
        assert!(!ping.matches("!", "!!ping"));
    }
}
