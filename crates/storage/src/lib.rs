//! Storage backends for the rendezvous store
//!
//! This crate implements the coordination store backends:
//! - HashStore: in-process map with a condition variable, atomic batch ops
//! - FileStore: one file per key in a shared directory, polling waits
//! - PrefixStore: namespacing decorator over any other store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod file;
pub mod hash;
pub mod prefix;

pub use file::{FileStore, DEFAULT_POLL_INTERVAL};
pub use hash::HashStore;
pub use prefix::PrefixStore;
