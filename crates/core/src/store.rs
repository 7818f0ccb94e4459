//! The coordination store contract
//!
//! A [`Store`] is a key-value medium that independently started ranks use
//! to exchange connection information before any direct link exists.
//! Backends only have to provide three primitives:
//!
//! - `set`: publish a value under a key (last writer wins)
//! - `get`: read a published value, never blocking for its appearance
//! - `wait`: block until a set of keys is published, bounded by a [`Timeout`]
//!
//! The batch and counter operations (`multi_get`, `multi_set`, `append`,
//! `add`) have default implementations in terms of those primitives, see
//! [`crate::derived`]. The defaults are NOT atomic across keys or across the
//! read-modify-write of `append`/`add`. A backend that can do better
//! overrides them and reports so through `has_v2_support`.
//!
//! # Visibility
//!
//! Once `set` returns, the value is visible to every later `get`/`wait`
//! from any thread or process sharing the medium. A reader that observes a
//! key as present reads the value of that `set` or a later one, never a
//! partial value. Nothing is guaranteed about the relative order of `set`s
//! on different keys from different callers.

use crate::derived;
use crate::error::Result;
use crate::timeout::Timeout;

/// A key-value coordination medium shared by the ranks of one job.
///
/// Keys are opaque strings chosen by the caller and are never deleted.
/// Values are opaque bytes.
pub trait Store: Send + Sync {
    /// Publish `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Read the value stored under `key`.
    ///
    /// Fails with `KeyNotFound` if the key was never published. Callers
    /// normally `wait` on the key first.
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Block until every key in `keys` is published or `timeout` elapses.
    ///
    /// This is a readiness barrier only; no values are returned.
    fn wait(&self, keys: &[&str], timeout: Timeout) -> Result<()>;

    /// Bound used by [`wait_default`](Store::wait_default).
    ///
    /// 30 seconds unless the backend was configured otherwise.
    fn default_timeout(&self) -> Timeout {
        Timeout::default()
    }

    /// `wait` bounded by this store's [`default_timeout`](Store::default_timeout).
    fn wait_default(&self, keys: &[&str]) -> Result<()> {
        self.wait(keys, self.default_timeout())
    }

    /// Whether the batch and counter operations are natively atomic.
    fn has_v2_support(&self) -> bool {
        false
    }

    /// Read several keys, in order.
    fn multi_get(&self, keys: &[&str]) -> Result<Vec<Vec<u8>>> {
        derived::multi_get(self, keys)
    }

    /// Publish several key/value pairs. `keys` and `values` must be the same
    /// length.
    fn multi_set(&self, keys: &[&str], values: &[&[u8]]) -> Result<()> {
        derived::multi_set(self, keys, values)
    }

    /// Append `value` to the bytes stored under `key`.
    ///
    /// An absent key is treated as empty, so the first append creates it.
    fn append(&self, key: &str, value: &[u8]) -> Result<()> {
        derived::append(self, key, value)
    }

    /// Add `delta` to the 64-bit counter under `key` and return the new total.
    ///
    /// An absent key, or a value that is not exactly 8 bytes, counts as zero.
    /// A total outside the `i64` range fails with `Overflow` and leaves the
    /// stored value untouched.
    fn add(&self, key: &str, delta: i64) -> Result<i64> {
        derived::add(self, key, delta)
    }
}

macro_rules! forward_store {
    ($($ty:ty),*) => {$(
        impl<S: Store + ?Sized> Store for $ty {
            fn set(&self, key: &str, value: &[u8]) -> Result<()> {
                (**self).set(key, value)
            }

            fn get(&self, key: &str) -> Result<Vec<u8>> {
                (**self).get(key)
            }

            fn wait(&self, keys: &[&str], timeout: Timeout) -> Result<()> {
                (**self).wait(keys, timeout)
            }

            fn default_timeout(&self) -> Timeout {
                (**self).default_timeout()
            }

            fn wait_default(&self, keys: &[&str]) -> Result<()> {
                (**self).wait_default(keys)
            }

            fn has_v2_support(&self) -> bool {
                (**self).has_v2_support()
            }

            fn multi_get(&self, keys: &[&str]) -> Result<Vec<Vec<u8>>> {
                (**self).multi_get(keys)
            }

            fn multi_set(&self, keys: &[&str], values: &[&[u8]]) -> Result<()> {
                (**self).multi_set(keys, values)
            }

            fn append(&self, key: &str, value: &[u8]) -> Result<()> {
                (**self).append(key, value)
            }

            fn add(&self, key: &str, delta: i64) -> Result<i64> {
                (**self).add(key, delta)
            }
        }
    )*};
}

// Handles forward every method, including a backend's own derived operations.
forward_store!(&S, std::sync::Arc<S>, Box<S>);
