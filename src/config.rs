//! Store configuration.
//!
//! Which backend a job uses is decided by whoever launches the ranks, so the
//! choice is captured in a small serializable [`StoreConfig`] that can travel
//! inside a job description. [`StoreBuilder`] is the fluent way to build one.
//!
//! ```ignore
//! use rendezvous::prelude::*;
//!
//! // Ranks are separate processes sharing /tmp/job-42
//! let store = StoreBuilder::new()
//!     .path("/tmp/job-42")
//!     .prefix("attempt1.")
//!     .open()?;
//! ```

use rendezvous_core::{Result, Store, Timeout};
use rendezvous_storage::{FileStore, HashStore, PrefixStore, DEFAULT_POLL_INTERVAL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Backing medium for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Backend {
    /// Threads of one process share a [`HashStore`]
    InMemory,
    /// Processes share a directory through a [`FileStore`]
    File {
        /// Directory holding one file per key
        path: PathBuf,
    },
}

/// Serializable store configuration.
///
/// Missing fields take their defaults, so `{}` is a valid in-memory config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backing medium
    pub backend: Backend,
    /// Optional key prefix applied on top of the backend
    pub prefix: Option<String>,
    /// Polling interval for the file backend, in milliseconds
    pub poll_interval_ms: u64,
    /// Default wait bound in milliseconds; `None` waits forever
    pub timeout_ms: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::InMemory,
            prefix: None,
            poll_interval_ms: millis(DEFAULT_POLL_INTERVAL),
            timeout_ms: Some(millis(rendezvous_core::DEFAULT_TIMEOUT)),
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl StoreConfig {
    /// Polling interval for the file backend
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Default wait bound for this store
    pub fn timeout(&self) -> Timeout {
        self.timeout_ms.map(Duration::from_millis).into()
    }

    /// Create the configured store.
    ///
    /// The returned store's `wait_default` is bounded by [`timeout`](Self::timeout).
    /// Each call to `open` on an in-memory config creates a fresh, empty map;
    /// share the returned handle between ranks instead of reopening.
    pub fn open(&self) -> Result<Arc<dyn Store>> {
        let store: Arc<dyn Store> = match &self.backend {
            Backend::InMemory => Arc::new(HashStore::new().with_timeout(self.timeout())),
            Backend::File { path } => Arc::new(
                FileStore::with_poll_interval(path, self.poll_interval())?
                    .with_timeout(self.timeout()),
            ),
        };
        debug!(
            backend = ?self.backend,
            prefix = ?self.prefix,
            timeout = ?self.timeout(),
            "opened store"
        );

        let store: Arc<dyn Store> = match &self.prefix {
            Some(prefix) => Arc::new(PrefixStore::new(prefix.clone(), store)),
            None => store,
        };
        Ok(store)
    }
}

/// Builder for [`StoreConfig`].
///
/// # Example
///
/// ```ignore
/// // Tests: ranks are threads
/// let store = StoreBuilder::new().in_memory().open()?;
///
/// // Multi-process job on one host
/// let store = StoreBuilder::new()
///     .path("/tmp/job-42")
///     .poll_interval(Duration::from_millis(5))
///     .open()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    config: StoreConfig,
}

impl StoreBuilder {
    /// Create a builder with default settings (in-memory, 30s timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the in-process backend.
    pub fn in_memory(mut self) -> Self {
        self.config.backend = Backend::InMemory;
        self
    }

    /// Use the filesystem backend rooted at `path`.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.backend = Backend::File {
            path: path.as_ref().to_path_buf(),
        };
        self
    }

    /// Scope every key under `prefix`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = Some(prefix.into());
        self
    }

    /// Polling interval for the filesystem backend.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = millis(interval);
        self
    }

    /// Bound for `wait_default` on the opened store.
    pub fn timeout(mut self, timeout: Timeout) -> Self {
        self.config.timeout_ms = timeout.as_duration().map(millis);
        self
    }

    /// The configuration built so far.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Finish building and return the configuration.
    pub fn build(self) -> StoreConfig {
        self.config
    }

    /// Open the configured store.
    pub fn open(self) -> Result<Arc<dyn Store>> {
        self.config.open()
    }
}
