//! Result classification for existence and disambiguation checks
//!
//! Typed errors are consumed directly. Errors that only carry text (for
//! example an upstream message relayed through [`WikiError::Api`]) are
//! matched against the known message formats:
//!
//! - `Page not found: <title>` marks a missing page
//! - `Disambiguation: ["A", "B", ...]` carries the candidate titles
//!
//! A message that mentions `Disambiguation` but has no bracketed list is
//! rejected instead of being read as an empty candidate list.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WikiError};

/// Marker for missing-page messages
pub const NOT_FOUND_MARKER: &str = "Page not found";

/// Marker for disambiguation messages
pub const DISAMBIGUATION_MARKER: &str = "Disambiguation";

/// Outcome of an existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Exists,
    Missing,
}

impl Existence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Existence::Exists => "true",
            Existence::Missing => "false",
        }
    }
}

/// Outcome of a disambiguation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisambiguationReport {
    pub disambiguation: bool,
    pub options: Vec<String>,
}

impl DisambiguationReport {
    pub fn unambiguous() -> Self {
        Self {
            disambiguation: false,
            options: Vec::new(),
        }
    }

    pub fn ambiguous(options: Vec<String>) -> Self {
        Self {
            disambiguation: true,
            options,
        }
    }
}

/// Map a page lookup outcome to existence. A disambiguation page exists;
/// errors other than "not found" are handed back unchanged.
pub fn classify_existence<T>(lookup: Result<T>) -> Result<Existence> {
    match lookup {
        Ok(_) | Err(WikiError::Disambiguation { .. }) => Ok(Existence::Exists),
        Err(WikiError::NotFound(_)) => Ok(Existence::Missing),
        Err(e) => {
            if text_only_message(&e).is_some_and(|m| m.contains(NOT_FOUND_MARKER)) {
                Ok(Existence::Missing)
            } else {
                Err(e)
            }
        }
    }
}

/// Map a page lookup outcome to a disambiguation report
pub fn classify_disambiguation<T>(lookup: Result<T>) -> Result<DisambiguationReport> {
    match lookup {
        Ok(_) => Ok(DisambiguationReport::unambiguous()),
        Err(WikiError::Disambiguation { options, .. }) => {
            Ok(DisambiguationReport::ambiguous(options))
        }
        Err(e) => {
            let parsed = text_only_message(&e)
                .filter(|m| m.contains(DISAMBIGUATION_MARKER))
                .map(parse_disambiguation_message);
            match parsed {
                Some(options) => options.map(DisambiguationReport::ambiguous),
                None => Err(e),
            }
        }
    }
}

/// The message of an error whose only payload is relayed text. Typed
/// variants return `None`: their text may embed a page title and must not
/// be matched against the message formats.
fn text_only_message(err: &WikiError) -> Option<&str> {
    match err {
        WikiError::Api(message) | WikiError::Internal(message) => Some(message.as_str()),
        _ => None,
    }
}

/// Extract candidate titles from a disambiguation message.
///
/// Takes the text between the first `[` and the last `]`, splits it on
/// commas, trims each piece and strips one pair of surrounding double
/// quotes. Empty pieces are dropped. Titles containing commas or brackets
/// cannot be represented in this format.
pub fn parse_disambiguation_message(message: &str) -> Result<Vec<String>> {
    let (start, end) = match (message.find('['), message.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(WikiError::Internal(format!(
                "unrecognized disambiguation message: {}",
                message
            )))
        }
    };

    Ok(message[start + 1..end]
        .split(',')
        .map(|piece| unquote(piece.trim()).trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect())
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}
