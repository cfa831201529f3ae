//! Runtime configuration, resolved once at startup and injected downward.
//!
//! The binary fills this from CLI flags and environment variables; nothing
//! below it reads process state on its own.

use std::time::Duration;

use crate::consts::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL, DEFAULT_OFFICIAL_EMAIL, DEFAULT_PROVIDER_TIMEOUT_SECS,
};

/// Everything the request path needs to know about its environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Identity echoed in every successful envelope.
    pub official_email: String,
    /// Upper bound the dispatcher puts on a single AI answer.
    pub provider_timeout: Duration,
    /// `None` when no credential was supplied; AI requests then fail.
    pub gemini: Option<GeminiConfig>,
}

/// Connection settings for the Gemini provider.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

// Keeps the key out of logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            official_email: DEFAULT_OFFICIAL_EMAIL.to_string(),
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            gemini: None,
        }
    }
}

impl ServiceConfig {
    /// Attach Gemini settings if `api_key` holds a usable credential.
    /// Blank keys count as missing.
    pub fn with_gemini(
        mut self,
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        self.gemini = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(|api_key| GeminiConfig {
                api_key,
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: base_url.unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout: self.provider_timeout,
            });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_provider() {
        let config = ServiceConfig::default();
        assert_eq!(config.official_email, DEFAULT_OFFICIAL_EMAIL);
        assert_eq!(config.provider_timeout, Duration::from_secs(15));
        assert!(config.gemini.is_none());
    }

    #[test]
    fn with_gemini_fills_defaults() {
        let config = ServiceConfig::default().with_gemini(Some("k".to_string()), None, None);
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "k");
        assert_eq!(gemini.model, DEFAULT_MODEL);
        assert_eq!(gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(gemini.timeout, config.provider_timeout);
    }

    #[test]
    fn blank_key_is_missing() {
        let config = ServiceConfig::default().with_gemini(Some("  ".to_string()), None, None);
        assert!(config.gemini.is_none());
        let config = ServiceConfig::default().with_gemini(None, Some("m".to_string()), None);
        assert!(config.gemini.is_none());
    }

    #[test]
    fn provider_timeout_carries_over() {
        let config = ServiceConfig {
            provider_timeout: Duration::from_secs(3),
            ..ServiceConfig::default()
        }
        .with_gemini(Some("k".to_string()), Some("gemini-pro".to_string()), None);
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.timeout, Duration::from_secs(3));
        assert_eq!(gemini.model, "gemini-pro");
    }

    #[test]
    fn debug_redacts_key() {
        let config = ServiceConfig::default().with_gemini(Some("secret-key".to_string()), None, None);
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("<redacted>"));
    }
}
