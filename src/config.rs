//! Server configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WikiError};
use crate::wiki::language::normalize_language;

/// Placeholder replaced by the language code in `api_host`
pub const LANGUAGE_PLACEHOLDER: &str = "{lang}";

/// Default API host template
pub const DEFAULT_API_HOST: &str = "https://{lang}.wikipedia.org";

/// Default User-Agent sent with every request (Wikimedia requires one)
pub const DEFAULT_USER_AGENT: &str = concat!(
    "wikipedia-mcp/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/wikipedia-mcp/wikipedia-mcp)"
);

/// Configuration for the Wikipedia client and MCP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Default language code used when a tool call does not name one
    pub language: String,
    /// User-Agent header for Wikipedia requests
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Host template, `{lang}` is replaced with the language code
    pub api_host: String,
    /// Maximum number of follow-up requests when paging through list results
    pub max_continuations: usize,
    /// Omit `isError` on failed tool calls
    pub legacy_error_envelope: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            api_host: DEFAULT_API_HOST.to_string(),
            max_continuations: 10,
            legacy_error_envelope: false,
        }
    }
}

impl ServerConfig {
    /// Check the configuration before starting the server
    pub fn validate(&self) -> Result<()> {
        normalize_language(&self.language)
            .map_err(|e| WikiError::Config(format!("language: {}", e)))?;

        if !self.api_host.contains(LANGUAGE_PLACEHOLDER) {
            return Err(WikiError::Config(format!(
                "api_host must contain {} placeholder: {}",
                LANGUAGE_PLACEHOLDER, self.api_host
            )));
        }

        if !(self.api_host.starts_with("https://") || self.api_host.starts_with("http://")) {
            return Err(WikiError::Config(format!(
                "api_host must be an http(s) URL: {}",
                self.api_host
            )));
        }

        if self.timeout_secs == 0 {
            return Err(WikiError::Config("timeout_secs must be positive".to_string()));
        }

        Ok(())
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL of the wiki for a language, e.g. `https://fr.wikipedia.org`
    pub fn host_for(&self, language: &str) -> String {
        self.api_host
            .replace(LANGUAGE_PLACEHOLDER, language)
            .trim_end_matches('/')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_host_for() {
        let config = ServerConfig::default();
        assert_eq!(config.host_for("fr"), "https://fr.wikipedia.org");

        let config = ServerConfig {
            api_host: "http://localhost:8080/{lang}/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.host_for("de"), "http://localhost:8080/de");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let missing_placeholder = ServerConfig {
            api_host: "https://en.wikipedia.org".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            missing_placeholder.validate(),
            Err(WikiError::Config(_))
        ));

        let bad_language = ServerConfig {
            language: "en us".to_string(),
            ..Default::default()
        };
        assert!(bad_language.validate().is_err());

        let zero_timeout = ServerConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }
}
