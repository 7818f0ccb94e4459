//! Convenient imports for Rendezvous.
//!
//! ```ignore
//! use rendezvous::prelude::*;
//!
//! let store = StoreBuilder::new().in_memory().open()?;
//! store.set("rank0.addr", b"10.0.0.1:4000")?;
//! ```

// Store contract
pub use crate::{Error, Result, Store, Timeout};

// Backends
pub use crate::{FileStore, HashStore, PrefixStore};

// Configuration and rank-level helpers
pub use crate::{Rendezvous, StoreBuilder, StoreConfig};
