//! Generic batch and counter operations
//!
//! These are the default bodies of the derived [`Store`] methods, written
//! purely against `get`/`set`. They live as free functions so that a
//! decorator that overrides the trait methods can still choose the generic
//! path explicitly.
//!
//! None of them are atomic: two concurrent `append`/`add` calls on the same
//! key can interleave their read and write, and the later `set` wins. That
//! is acceptable for bootstrap, where each key has a single publisher.

use crate::error::{Error, Result};
use crate::store::Store;
use byteorder::{ByteOrder, NativeEndian};

/// Width of an encoded counter value.
pub const COUNTER_WIDTH: usize = 8;

/// Encode a counter in host byte order.
pub fn encode_counter(value: i64) -> [u8; COUNTER_WIDTH] {
    let mut buf = [0u8; COUNTER_WIDTH];
    NativeEndian::write_i64(&mut buf, value);
    buf
}

/// Decode a counter, or `None` if `data` is not exactly [`COUNTER_WIDTH`] bytes.
pub fn decode_counter(data: &[u8]) -> Option<i64> {
    (data.len() == COUNTER_WIDTH).then(|| NativeEndian::read_i64(data))
}

/// Fail with `InvalidArgument` unless a batch has one value per key.
pub fn check_batch(keys: usize, values: usize) -> Result<()> {
    if keys != values {
        return Err(Error::InvalidArgument(format!(
            "multi_set got {} keys but {} values",
            keys, values
        )));
    }
    Ok(())
}

/// `current + delta`, or an `Overflow` error naming `key`.
pub fn checked_add(key: &str, current: i64, delta: i64) -> Result<i64> {
    current.checked_add(delta).ok_or_else(|| Error::Overflow {
        key: key.to_string(),
        current,
        delta,
    })
}

/// Sequential `get` per key.
pub fn multi_get<S: Store + ?Sized>(store: &S, keys: &[&str]) -> Result<Vec<Vec<u8>>> {
    keys.iter().map(|key| store.get(key)).collect()
}

/// Sequential `set` per pair. Stops at the first failure; earlier pairs stay
/// published.
pub fn multi_set<S: Store + ?Sized>(store: &S, keys: &[&str], values: &[&[u8]]) -> Result<()> {
    check_batch(keys.len(), values.len())?;
    for (key, value) in keys.iter().zip(values) {
        store.set(key, value)?;
    }
    Ok(())
}

/// Read, concatenate, write back.
pub fn append<S: Store + ?Sized>(store: &S, key: &str, value: &[u8]) -> Result<()> {
    let mut current = get_or_empty(store, key)?;
    current.extend_from_slice(value);
    store.set(key, &current)
}

/// Read, decode, add, encode, write back.
pub fn add<S: Store + ?Sized>(store: &S, key: &str, delta: i64) -> Result<i64> {
    let current = decode_counter(&get_or_empty(store, key)?).unwrap_or(0);
    let total = checked_add(key, current, delta)?;
    store.set(key, &encode_counter(total))?;
    Ok(total)
}

/// `get`, mapping a missing key to an empty value.
fn get_or_empty<S: Store + ?Sized>(store: &S, key: &str) -> Result<Vec<u8>> {
    match store.get(key) {
        Err(e) if e.is_key_not_found() => Ok(Vec::new()),
        other => other,
    }
}
