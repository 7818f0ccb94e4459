//! Error types for coordination store operations
//!
//! Every store operation reports failures synchronously through [`Error`].
//! The variants group into four kinds that callers branch on:
//!
//! | Kind | Variants | Raised by |
//! |------|----------|-----------|
//! | missing-key | `KeyNotFound` | `get`, `multi_get` |
//! | timeout | `Timeout` | `wait` |
//! | system | `Io`, `InvalidKey` | filesystem backend |
//! | argument | `InvalidArgument`, `Overflow` | batch and counter operations |
//!
//! A rendezvous attempt has no partial-success mode, so callers are expected
//! to treat any of these as fatal for the affected rank.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a coordination store.
#[derive(Debug, Error)]
pub enum Error {
    /// `get` was called on a key that was never published
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing key
        key: String,
    },

    /// `wait` reached its deadline before every key was published
    #[error("timed out after {timeout:?} waiting for keys: {}", .keys.join(", "))]
    Timeout {
        /// Keys that were still missing at the deadline
        keys: Vec<String>,
        /// The timeout the caller asked for
        timeout: Duration,
    },

    /// An underlying filesystem or OS call failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be mapped onto the backing medium
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    /// A caller passed inconsistent arguments
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `add` would overflow a signed 64-bit counter
    #[error("counter overflow on {key}: {current} + {delta}")]
    Overflow {
        /// Counter key
        key: String,
        /// Value stored before the add
        current: i64,
        /// Requested delta
        delta: i64,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a missing-key error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Error::KeyNotFound { key: key.into() }
    }

    /// Build an invalid-key error.
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a missing-key error.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }

    /// Check if this is a wait timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Check if this came from the OS or the backing medium.
    pub fn is_system(&self) -> bool {
        matches!(self, Error::Io(_) | Error::InvalidKey { .. })
    }

    /// Check if the caller passed bad arguments.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::Overflow { .. })
    }
}
