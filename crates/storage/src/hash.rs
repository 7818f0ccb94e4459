//! In-process coordination store
//!
//! A single mutex-protected map plus one condition variable. Usable when all
//! ranks are threads of one process, which is the common case in tests.
//!
//! # Wakeups
//!
//! `set` inserts and broadcasts while holding the map lock, and `wait`
//! re-checks its whole key set under that same lock before every sleep.
//! A waiter therefore cannot miss a publication that happens between its
//! check and its sleep. A broadcast only means *some* key changed, so the
//! waiter always re-checks all of its keys after waking.
//!
//! # Batch operations
//!
//! Everything runs under the one lock, so `multi_get`, `multi_set`,
//! `append` and `add` are atomic here and the store reports
//! `has_v2_support() == true`.

use parking_lot::{Condvar, Mutex};
use rendezvous_core::derived::{check_batch, checked_add, decode_counter, encode_counter};
use rendezvous_core::{Error, Result, Store, Timeout};
use rustc_hash::FxHashMap;
use std::time::Instant;
use tracing::{debug, trace};

/// Thread-safe in-memory store.
///
/// # Example
///
/// ```ignore
/// use rendezvous_storage::HashStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(HashStore::new());
/// store.set("rank0.addr", b"10.0.0.1:4000")?;
/// store.wait(&["rank0.addr"], Timeout::default())?;
/// ```
#[derive(Debug, Default)]
pub struct HashStore {
    map: Mutex<FxHashMap<String, Vec<u8>>>,
    published: Condvar,
    timeout: Timeout,
}

impl HashStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound `wait_default` by `timeout` instead of 30 seconds.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of published keys
    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    /// Check if nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }

    /// Check if `key` has been published
    pub fn contains(&self, key: &str) -> bool {
        self.map.lock().contains_key(key)
    }
}

fn missing_keys(map: &FxHashMap<String, Vec<u8>>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .filter(|key| !map.contains_key(**key))
        .map(|key| key.to_string())
        .collect()
}

impl Store for HashStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut map = self.map.lock();
        map.insert(key.to_string(), value.to_vec());
        self.published.notify_all();
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.map
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::key_not_found(key))
    }

    fn wait(&self, keys: &[&str], timeout: Timeout) -> Result<()> {
        let mut map = self.map.lock();
        if keys.iter().all(|key| map.contains_key(*key)) {
            return Ok(());
        }

        let deadline = timeout.deadline_from(Instant::now());
        trace!(?keys, ?timeout, "waiting for keys");
        loop {
            match deadline {
                None => self.published.wait(&mut map),
                Some(deadline) => {
                    if self.published.wait_until(&mut map, deadline).timed_out() {
                        let missing = missing_keys(&map, keys);
                        if missing.is_empty() {
                            return Ok(());
                        }
                        debug!(?missing, ?timeout, "wait timed out");
                        return Err(Error::Timeout {
                            keys: missing,
                            timeout: timeout.as_duration().unwrap_or_default(),
                        });
                    }
                }
            }

            if keys.iter().all(|key| map.contains_key(*key)) {
                return Ok(());
            }
        }
    }

    fn default_timeout(&self) -> Timeout {
        self.timeout
    }

    fn has_v2_support(&self) -> bool {
        true
    }

    fn multi_get(&self, keys: &[&str]) -> Result<Vec<Vec<u8>>> {
        let map = self.map.lock();
        keys.iter()
            .map(|key| {
                map.get(*key)
                    .cloned()
                    .ok_or_else(|| Error::key_not_found(*key))
            })
            .collect()
    }

    fn multi_set(&self, keys: &[&str], values: &[&[u8]]) -> Result<()> {
        check_batch(keys.len(), values.len())?;
        let mut map = self.map.lock();
        for (key, value) in keys.iter().zip(values) {
            map.insert(key.to_string(), value.to_vec());
        }
        self.published.notify_all();
        Ok(())
    }

    fn append(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut map = self.map.lock();
        map.entry(key.to_string())
            .or_default()
            .extend_from_slice(value);
        self.published.notify_all();
        Ok(())
    }

    fn add(&self, key: &str, delta: i64) -> Result<i64> {
        let mut map = self.map.lock();
        let current = map
            .get(key)
            .and_then(|value| decode_counter(value))
            .unwrap_or(0);
        let total = checked_add(key, current, delta)?;
        map.insert(key.to_string(), encode_counter(total).to_vec());
        self.published.notify_all();
        Ok(total)
    }
}
