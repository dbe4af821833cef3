//! Common error types shared by the keyseq collections
//!
//! This module provides the error vocabulary every collection in the crate
//! builds on.
//!
//! # Error Handling Architecture
//!
//! 1. **`CommonError`**: error patterns shared across modules (rejected
//!    configuration values).
//!
//! 2. **`ErrorClassification` trait**: classifies errors by retryability,
//!    severity and criticality. Module-specific errors (such as
//!    [`TrieError`](crate::collections::trie::TrieError)) implement it next
//!    to their definition.
//!
//! 3. **`ErrorSeverity` enum**: unified severity levels.
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Missing child node |
//! | **Warning** | Caller-visible but harmless | Duplicate insert |
//! | **Error** | Failure requiring attention | Invalid configuration |
//! | **Critical** | Integrity at risk | Reserved for broken invariants |

use std::fmt;
use std::time::Duration;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Common error variants that appear across multiple modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// A configuration field holds a value the component cannot accept
    Validation { field: String, message: String, value: Option<String> },
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message, value } => {
                if let Some(value) = value {
                    write!(
                        f,
                        "Validation error for field '{}' (value: '{}'): {}",
                        field, value, message
                    )
                } else {
                    write!(f, "Validation error for field '{}': {}", field, message)
                }
            }
        }
    }
}

impl std::error::Error for CommonError {}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    /// Create a validation error with the invalid value
    pub fn validation_with_value<F: Into<String>, M: Into<String>, V: Into<String>>(
        field: F,
        message: M,
        value: V,
    ) -> Self {
        Self::Validation { field: field.into(), message: message.into(), value: Some(value.into()) }
    }
}

/// Standard interface for classifying errors
///
/// All error types in the crate implement this trait so callers can make
/// uniform decisions about logging and retries.
pub trait ErrorClassification {
    /// Whether repeating the same operation could succeed.
    fn is_retryable(&self) -> bool;

    /// Severity of the error for logging.
    fn severity(&self) -> ErrorSeverity;

    /// Whether this error indicates a broken invariant.
    ///
    /// Critical errors should never be swallowed.
    fn is_critical(&self) -> bool;

    /// Suggested retry delay, if any.
    fn retry_after(&self) -> Option<Duration>;
}

/// Unified severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
