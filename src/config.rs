use std::{env, time::Duration};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_CHAT_FALLBACK: &str = "Sorry, I couldn't process that. Try again!";

/// What the transcript shows when a chat request fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatFallback {
    /// Always the same text.
    Fixed(String),
    /// `Error: {response}` read from the error payload.
    ServerResponse,
}

impl Default for ChatFallback {
    fn default() -> Self {
        Self::Fixed(DEFAULT_CHAT_FALLBACK.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub chat_fallback: ChatFallback,
    pub chat_placeholder: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            chat_fallback: ChatFallback::default(),
            chat_placeholder: true,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("FORM_SYNC_BASE_URL")
            .map(|value| normalize_base_url(&value))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let timeout = lookup("FORM_SYNC_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let chat_fallback = match lookup("FORM_SYNC_CHAT_FALLBACK").as_deref().map(str::trim) {
            Some("server") => ChatFallback::ServerResponse,
            _ => ChatFallback::default(),
        };

        let chat_placeholder = !matches!(
            lookup("FORM_SYNC_CHAT_PLACEHOLDER").as_deref().map(str::trim),
            Some("off" | "0" | "false")
        );

        Self {
            base_url,
            timeout,
            chat_fallback,
            chat_placeholder,
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert!(config.chat_placeholder);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("FORM_SYNC_BASE_URL", "http://fit.local:8000/ "),
            ("FORM_SYNC_TIMEOUT_SECS", "15"),
            ("FORM_SYNC_CHAT_FALLBACK", "server"),
            ("FORM_SYNC_CHAT_PLACEHOLDER", "off"),
        ]));
        assert_eq!(config.base_url, "http://fit.local:8000");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.chat_fallback, ChatFallback::ServerResponse);
        assert!(!config.chat_placeholder);
    }

    #[test]
    fn ignores_unparseable_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[("FORM_SYNC_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.timeout, None);
    }
}
