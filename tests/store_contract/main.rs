//! Store Contract Test Suite
//!
//! Verifies the coordination store contract against every backend, and the
//! bootstrap exchange built on top of it.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test store_contract
//!
//! # Filesystem backend only
//! cargo test --test store_contract file_store::
//! ```

use std::sync::Arc;
use std::time::Duration;

use rendezvous::{FileStore, HashStore, Store};
use tempfile::TempDir;

// Test modules
pub mod bootstrap;
pub mod file_store;
pub mod prefix_store;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Install a tracing subscriber that writes through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

/// A file store in a fresh temp directory.
///
/// The `TempDir` must outlive every handle on the store.
pub fn temp_file_store() -> (TempDir, Arc<FileStore>) {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileStore::with_poll_interval(dir.path().join("store"), Duration::from_millis(2))
        .expect("Failed to open file store");
    (dir, Arc::new(store))
}

/// A shared in-process store.
pub fn hash_store() -> Arc<HashStore> {
    init_tracing();
    Arc::new(HashStore::new())
}

/// Run `check` once per backend.
pub fn for_each_backend(check: impl Fn(&str, Arc<dyn Store>)) {
    check("hash", hash_store());

    let (_dir, store) = temp_file_store();
    check("file", store);
}
