//! Wikipedia data access
//!
//! The [`WikiSource`] trait is the seam between the MCP tool dispatcher and
//! Wikipedia itself. [`HttpWikiClient`] talks to the MediaWiki Action API and
//! the Wikimedia REST API; tests substitute their own implementation.
//!
//! Every operation takes the language explicitly. The process-wide default
//! lives in [`LanguageState`] and is resolved by the caller before the
//! request starts.

pub mod classify;
pub mod client;
pub mod language;
pub mod types;

pub use classify::{
    classify_disambiguation, classify_existence, parse_disambiguation_message,
    DisambiguationReport, Existence,
};
pub use client::{HttpWikiClient, WikiSource};
pub use language::{normalize_language, LanguageError, LanguageState, MAX_LANGUAGE_LENGTH};
pub use types::*;
