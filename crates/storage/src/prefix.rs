//! Key-scoping decorator
//!
//! [`PrefixStore`] maps every logical key to `prefix + key` in a backing
//! store, so several logical contexts (sessions, sub-groups) can share one
//! physical store without colliding. Two decorators with different prefixes
//! over the same backing store see disjoint key sets, provided neither prefix
//! is itself a prefix of the other.
//!
//! ## Batch operations
//!
//! | Backing store | `multi_get` / `multi_set` / `append` / `add` |
//! |---------------|-----------------------------------------------|
//! | `has_v2_support()` | prefixed keys forwarded to the native implementation |
//! | otherwise | generic per-key emulation through this decorator's own `get`/`set` |
//!
//! The fallback never assumes atomicity the backend does not provide, and the
//! final state is identical with or without the decorator.
//!
//! ## Ownership
//!
//! The decorator owns only its prefix. The backing store is any `S: Store`,
//! so pass `&store` for a borrowed, lifetime-checked view or an `Arc` to
//! share ownership.

use rendezvous_core::{derived, Result, Store, Timeout};

/// A store view whose keys are all namespaced under a fixed prefix.
///
/// # Example
///
/// ```ignore
/// let backing = HashStore::new();
/// let session = PrefixStore::new("session1.", &backing);
///
/// session.set("rank0.addr", b"...")?;
/// assert!(backing.contains("session1.rank0.addr"));
/// ```
#[derive(Debug, Clone)]
pub struct PrefixStore<S> {
    prefix: String,
    store: S,
}

impl<S: Store> PrefixStore<S> {
    /// Wrap `store`, scoping every key under `prefix`
    pub fn new(prefix: impl Into<String>, store: S) -> Self {
        Self {
            prefix: prefix.into(),
            store,
        }
    }

    /// The prefix applied to every key
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The backing store
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Physical key for a logical `key`
    pub fn join_key(&self, key: &str) -> String {
        let mut joined = String::with_capacity(self.prefix.len() + key.len());
        joined.push_str(&self.prefix);
        joined.push_str(key);
        joined
    }

    fn join_keys(&self, keys: &[&str]) -> Vec<String> {
        keys.iter().map(|key| self.join_key(key)).collect()
    }
}

fn as_strs(keys: &[String]) -> Vec<&str> {
    keys.iter().map(String::as_str).collect()
}

impl<S: Store> Store for PrefixStore<S> {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.store.set(&self.join_key(key), value)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.store.get(&self.join_key(key))
    }

    fn wait(&self, keys: &[&str], timeout: Timeout) -> Result<()> {
        let joined = self.join_keys(keys);
        self.store.wait(&as_strs(&joined), timeout)
    }

    fn default_timeout(&self) -> Timeout {
        self.store.default_timeout()
    }

    fn has_v2_support(&self) -> bool {
        self.store.has_v2_support()
    }

    fn multi_get(&self, keys: &[&str]) -> Result<Vec<Vec<u8>>> {
        if !self.store.has_v2_support() {
            return derived::multi_get(self, keys);
        }
        let joined = self.join_keys(keys);
        self.store.multi_get(&as_strs(&joined))
    }

    fn multi_set(&self, keys: &[&str], values: &[&[u8]]) -> Result<()> {
        if !self.store.has_v2_support() {
            return derived::multi_set(self, keys, values);
        }
        let joined = self.join_keys(keys);
        self.store.multi_set(&as_strs(&joined), values)
    }

    fn append(&self, key: &str, value: &[u8]) -> Result<()> {
        if !self.store.has_v2_support() {
            return derived::append(self, key, value);
        }
        self.store.append(&self.join_key(key), value)
    }

    fn add(&self, key: &str, delta: i64) -> Result<i64> {
        if !self.store.has_v2_support() {
            return derived::add(self, key, delta);
        }
        self.store.add(&self.join_key(key), delta)
    }
}
