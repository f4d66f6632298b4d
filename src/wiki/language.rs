//! Language code handling and the process-wide default language

use std::sync::Arc;

use parking_lot::RwLock;

/// Maximum language code length (longest real codes are around a dozen chars)
pub const MAX_LANGUAGE_LENGTH: usize = 32;

/// Language code validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageError {
    #[error("Language code cannot be empty")]
    Empty,
    #[error("Language code exceeds {} characters", MAX_LANGUAGE_LENGTH)]
    TooLong,
    #[error("Language code can only contain letters, numbers, and hyphens")]
    InvalidChars,
}

/// Normalize and validate a language code
///
/// Rules:
/// - Trimmed and lowercased
/// - 1-32 characters
/// - ASCII letters, digits and `-` only, not starting or ending with `-`
pub fn normalize_language(s: &str) -> Result<String, LanguageError> {
    let normalized = s.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(LanguageError::Empty);
    }

    if normalized.len() > MAX_LANGUAGE_LENGTH {
        return Err(LanguageError::TooLong);
    }

    if !normalized
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        || normalized.starts_with('-')
        || normalized.ends_with('-')
    {
        return Err(LanguageError::InvalidChars);
    }

    Ok(normalized)
}

/// Shared default language.
///
/// Single writer (`set_language`), many readers. Readers take a snapshot
/// before issuing a request, so a concurrent change never affects a request
/// already in flight.
#[derive(Debug, Clone)]
pub struct LanguageState {
    current: Arc<RwLock<String>>,
}

impl LanguageState {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            current: Arc::new(RwLock::new(language.into())),
        }
    }

    /// Snapshot of the current default
    pub fn current(&self) -> String {
        self.current.read().clone()
    }

    /// Replace the default, returning the previous value
    pub fn set(&self, language: &str) -> Result<String, LanguageError> {
        let normalized = normalize_language(language)?;
        let previous = std::mem::replace(&mut *self.current.write(), normalized);
        Ok(previous)
    }

    /// Pick the per-call override if present, otherwise the default
    pub fn resolve(&self, requested: Option<&str>) -> Result<String, LanguageError> {
        match requested {
            Some(lang) if !lang.trim().is_empty() => normalize_language(lang),
            _ => Ok(self.current()),
        }
    }
}

impl Default for LanguageState {
    fn default() -> Self {
        Self::new("en")
    }
}
