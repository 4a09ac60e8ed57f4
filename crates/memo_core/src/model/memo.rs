//! Memo identity model.
//!
//! # Responsibility
//! - Derive storage identifiers from user-supplied titles.
//! - Recognize memo entries among unrelated keys in the shared store.
//!
//! # Invariants
//! - A `MemoId` always carries the `memo-` namespace prefix.
//! - The title part of a `MemoId` is never empty or whitespace-only.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Namespace prefix separating memo entries from other stored data.
pub const MEMO_KEY_PREFIX: &str = "memo-";

/// Validation failures for memo titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    /// Title is empty after trimming whitespace.
    EmptyTitle,
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "memo title must not be empty"),
        }
    }
}

impl Error for MemoValidationError {}

/// Stable identifier of one memo, equal to its storage key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoId(String);

impl MemoId {
    /// Derives an identifier from title text.
    ///
    /// Whitespace only matters for the blank check; the key keeps the title
    /// as typed, so `" groceries"` and `"groceries"` are different memos.
    pub fn from_title(title: &str) -> Result<Self, MemoValidationError> {
        if title.trim().is_empty() {
            return Err(MemoValidationError::EmptyTitle);
        }
        Ok(Self(format!("{MEMO_KEY_PREFIX}{title}")))
    }

    /// Parses a raw storage key, returning `None` for non-memo keys.
    pub fn from_key(key: &str) -> Option<Self> {
        let title = key.strip_prefix(MEMO_KEY_PREFIX)?;
        if title.trim().is_empty() {
            return None;
        }
        Some(Self(key.to_string()))
    }

    /// Full namespaced storage key.
    pub fn as_key(&self) -> &str {
        &self.0
    }

    /// Display title without the namespace prefix.
    pub fn title(&self) -> &str {
        self.0.strip_prefix(MEMO_KEY_PREFIX).unwrap_or(&self.0)
    }
}

impl Display for MemoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MemoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
