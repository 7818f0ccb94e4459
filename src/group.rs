//! Rank-level rendezvous on top of a store.
//!
//! A transport layer bootstraps a group of `size` ranks by having each rank
//! publish something (typically its listening address) under a rank-specific
//! key and then reading what its peers published:
//!
//! ```text
//! rank0.addr  rank1.addr  rank2.addr      <- one key per rank and kind
//! ```
//!
//! [`Rendezvous`] encodes that key scheme and the publish/wait/read sequence.
//! It only uses the public [`Store`] contract, so it works over any backend.
//!
//! ## Sessions
//!
//! [`Rendezvous::scoped`] wraps the store in a [`PrefixStore`] so that a
//! second logical context (for example a sub-communicator, or a retry after
//! a failed attempt) can reuse the same physical store without colliding.
//!
//! Barrier generations are tracked per session and shared by every handle
//! derived from the same [`Rendezvous::new`], so scoping the same session
//! twice continues its barrier numbering instead of restarting it.

use parking_lot::Mutex;
use rendezvous_core::{Error, Result, Store, Timeout};
use rendezvous_storage::PrefixStore;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One rank's handle on a group rendezvous.
///
/// # Example
///
/// ```ignore
/// let store = StoreBuilder::new().path("/tmp/job-42").open()?;
/// let rdv = Rendezvous::new(rank, size, store)?;
///
/// let addrs = rdv.exchange("addr", my_addr.as_bytes())?;
/// // addrs[i] is what rank i published
/// ```
pub struct Rendezvous {
    rank: usize,
    size: usize,
    store: Arc<dyn Store>,
    timeout: Timeout,
    /// Full key prefix of this handle's session, empty for the root
    session: String,
    /// Barrier generation of this session, advanced on every `barrier` call
    barriers: Arc<AtomicU64>,
    /// Generations of every session reachable from the root handle
    generations: Arc<Mutex<FxHashMap<String, Arc<AtomicU64>>>>,
}

impl fmt::Debug for Rendezvous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rendezvous")
            .field("rank", &self.rank)
            .field("size", &self.size)
            .field("timeout", &self.timeout)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Rendezvous {
    /// Create the handle for `rank` in a group of `size`.
    ///
    /// Waits are bounded by the store's `default_timeout` until
    /// [`with_timeout`](Self::with_timeout) says otherwise.
    ///
    /// Fails with `InvalidArgument` if `size` is zero or `rank >= size`.
    pub fn new(rank: usize, size: usize, store: Arc<dyn Store>) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidArgument("group size must be positive".into()));
        }
        if rank >= size {
            return Err(Error::InvalidArgument(format!(
                "rank {} out of range for group of {}",
                rank, size
            )));
        }
        let barriers = Arc::new(AtomicU64::new(0));
        let mut generations = FxHashMap::default();
        generations.insert(String::new(), Arc::clone(&barriers));
        Ok(Self {
            rank,
            size,
            timeout: store.default_timeout(),
            store,
            session: String::new(),
            barriers,
            generations: Arc::new(Mutex::new(generations)),
        })
    }

    /// Use `timeout` for every wait this handle performs.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// This rank
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Group size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Wait bound
    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Key under which `rank` publishes data of `kind`.
    pub fn rank_key(rank: usize, kind: &str) -> String {
        format!("rank{}.{}", rank, kind)
    }

    fn group_keys(&self, kind: &str) -> Vec<String> {
        (0..self.size).map(|r| Self::rank_key(r, kind)).collect()
    }

    /// Publish `value` as this rank's `kind`.
    pub fn publish(&self, kind: &str, value: &[u8]) -> Result<()> {
        let key = Self::rank_key(self.rank, kind);
        debug!(rank = self.rank, key = %key, len = value.len(), "publishing");
        self.store.set(&key, value)
    }

    /// Block until every rank, this one included, has published `kind`.
    pub fn wait_for_peers(&self, kind: &str) -> Result<()> {
        let keys = self.group_keys(kind);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.store.wait(&keys, self.timeout)
    }

    /// Read what `rank` published as `kind`.
    ///
    /// Does not wait; call [`wait_for_peers`](Self::wait_for_peers) first.
    pub fn read_peer(&self, rank: usize, kind: &str) -> Result<Vec<u8>> {
        if rank >= self.size {
            return Err(Error::InvalidArgument(format!(
                "rank {} out of range for group of {}",
                rank, self.size
            )));
        }
        self.store.get(&Self::rank_key(rank, kind))
    }

    /// All-gather: publish `value`, wait for every rank, and return every
    /// rank's value indexed by rank.
    pub fn exchange(&self, kind: &str, value: &[u8]) -> Result<Vec<Vec<u8>>> {
        self.publish(kind, value)?;
        self.wait_for_peers(kind)?;

        let keys = self.group_keys(kind);
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let values = self.store.multi_get(&keys)?;
        debug!(rank = self.rank, kind, peers = values.len(), "exchange complete");
        Ok(values)
    }

    /// Block until every rank has reached a barrier named `name`.
    ///
    /// Every rank must call barriers in the same order. Each call publishes
    /// a fresh marker key, so the same name can be reused and no
    /// read-modify-write is needed on the store.
    pub fn barrier(&self, name: &str) -> Result<()> {
        let generation = self.barriers.fetch_add(1, Ordering::Relaxed);
        let kind = format!("{}.{}", name, generation);
        self.publish(&kind, &[])?;
        self.wait_for_peers(&kind)
    }

    /// A handle for the same rank whose keys live under `"{session}."`.
    ///
    /// Handles for the same session share their barrier generation.
    pub fn scoped(&self, session: &str) -> Rendezvous {
        let prefix = format!("{}.", session);
        let full = format!("{}{}", self.session, prefix);
        let barriers = Arc::clone(self.generations.lock().entry(full.clone()).or_default());
        let store: Arc<dyn Store> = Arc::new(PrefixStore::new(prefix, Arc::clone(&self.store)));
        Rendezvous {
            rank: self.rank,
            size: self.size,
            store,
            timeout: self.timeout,
            session: full,
            barriers,
            generations: Arc::clone(&self.generations),
        }
    }
}
