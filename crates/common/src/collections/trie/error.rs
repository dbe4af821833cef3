use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Trie operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    /// `get_child` was called for a key element with no child.
    #[error("No child node for the requested key element")]
    ChildNotFound,

    /// A value is already stored for the key sequence.
    #[error("A value is already stored for this key sequence")]
    DuplicateKey,
}

impl ErrorClassification for TrieError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ChildNotFound => ErrorSeverity::Info,
            Self::DuplicateKey => ErrorSeverity::Warning,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Error returned by `add` when the key sequence already has a value.
///
/// The stored value is left untouched and the rejected value is handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError<V>(V);

impl<V> DuplicateKeyError<V> {
    pub(crate) fn new(rejected: V) -> Self {
        Self(rejected)
    }

    /// Returns the value that was not stored.
    #[must_use]
    pub fn into_inner(self) -> V {
        self.0
    }

    /// Borrows the value that was not stored.
    pub fn rejected(&self) -> &V {
        &self.0
    }
}

impl<V> fmt::Display for DuplicateKeyError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a value is already stored for this key sequence")
    }
}

impl<V: fmt::Debug> std::error::Error for DuplicateKeyError<V> {}

impl<V> From<DuplicateKeyError<V>> for TrieError {
    fn from(_: DuplicateKeyError<V>) -> Self {
        Self::DuplicateKey
    }
}
