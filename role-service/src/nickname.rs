//! Custom title values.

use crate::error::LifecycleError;
use std::fmt;

/// Platform limit on an administrator custom title, in characters.
pub const MAX_TITLE_CHARS: usize = 16;

/// A trimmed, non-empty title of at most [`MAX_TITLE_CHARS`] characters.
///
/// The same value is stored on the user record, written to role history and sent to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nickname(String);

impl Nickname {
    /// Trims, rejects empty input and truncates longer input on a character boundary.
    pub fn parse(raw: &str) -> Result<Self, LifecycleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LifecycleError::InvalidNickname(
                "nickname is empty".to_string(),
            ));
        }
        let truncated: String = trimmed.chars().take(MAX_TITLE_CHARS).collect();
        Ok(Self(truncated.trim_end().to_string()))
    }

    /// True when `raw` (trimmed) fits without truncation.
    pub fn fits(raw: &str) -> bool {
        raw.trim().chars().count() <= MAX_TITLE_CHARS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
