//! Error types for the Wikipedia MCP server

use thiserror::Error;

/// Result type alias for Wikipedia operations
pub type Result<T> = std::result::Result<T, WikiError>;

/// Main error type for Wikipedia lookups
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Page not found: {0}")]
    NotFound(String),

    /// The title resolved to a disambiguation page.
    ///
    /// The display form is `Disambiguation: ["A", "B"]`, which is the
    /// message format the text classifier understands.
    #[error("Disambiguation: [{}]", quoted_list(.options))]
    Disambiguation { title: String, options: Vec<String> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Wikipedia API error: {0}")]
    Api(String),

    #[error("Rate limited by Wikipedia API")]
    RateLimited,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn quoted_list(options: &[String]) -> String {
    options
        .iter()
        .map(|o| format!("\"{}\"", o))
        .collect::<Vec<_>>()
        .join(", ")
}

impl WikiError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, WikiError::Http(_) | WikiError::RateLimited)
    }

    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            WikiError::NotFound(_) => -32001,
            WikiError::Disambiguation { .. } => -32002,
            WikiError::InvalidInput(_) => -32602,
            WikiError::RateLimited => -32004,
            _ => -32000,
        }
    }
}
