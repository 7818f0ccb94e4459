//! # Rendezvous
//!
//! Out-of-band rendezvous for bootstrapping collective communication.
//!
//! Independently started ranks know nothing about each other's network
//! location. Before a transport layer can open direct peer-to-peer links,
//! each rank publishes its address in a shared coordination [`Store`] and
//! waits for its peers to do the same.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rendezvous::prelude::*;
//!
//! // Every rank opens the same directory
//! let store = StoreBuilder::new().path("/tmp/job-42").open()?;
//!
//! store.set("rank0.addr", b"10.0.0.1:4000")?;
//! store.wait(&["rank0.addr", "rank1.addr"], Timeout::default())?;
//! let peer = store.get("rank1.addr")?;
//! ```
//!
//! ## Backends
//!
//! - [`HashStore`] - threads in one process, condition-variable wakeups
//! - [`FileStore`] - processes sharing a directory, polling wakeups
//! - [`PrefixStore`] - namespaces keys over any other store
//!
//! ## Derived operations
//!
//! `multi_get`, `multi_set`, `append` and `add` work on every backend.
//! Unless [`Store::has_v2_support`] is true they are emulated with
//! `get`/`set` and are not atomic.

#![warn(missing_docs)]

mod config;
mod group;

pub mod prelude;

// Re-export the store contract
pub use rendezvous_core::{
    decode_counter, derived, encode_counter, Error, Result, Store, Timeout, COUNTER_WIDTH,
    DEFAULT_TIMEOUT,
};

// Re-export backends
pub use rendezvous_storage::{FileStore, HashStore, PrefixStore, DEFAULT_POLL_INTERVAL};

pub use config::{Backend, StoreBuilder, StoreConfig};
pub use group::Rendezvous;
