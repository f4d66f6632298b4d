//! Wikipedia MCP - Wikipedia tools for AI agents
//!
//! Exposes Wikipedia summaries, full text, links, images, categories,
//! search and "on this day" events as Model Context Protocol tools.

pub mod config;
pub mod error;
pub mod mcp;
pub mod wiki;

pub use config::ServerConfig;
pub use error::{Result, WikiError};
pub use wiki::{HttpWikiClient, LanguageState, WikiSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name reported during MCP initialization
pub const SERVER_NAME: &str = "wikipedia";

/// Server description reported during MCP initialization
pub const SERVER_DESCRIPTION: &str = "Provides tools to query Wikipedia content, including summary, full content, references, categories, images, links, and more.";
