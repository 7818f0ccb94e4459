//! Filesystem Backend Tests
//!
//! Each rank opens its own `FileStore` on the shared directory, the way
//! separate processes would.

use crate::*;
use rendezvous::{Error, Timeout};
use std::fs;
use std::thread;
use std::time::Instant;

#[test]
fn test_independent_handles_share_state() {
    let (dir, store) = temp_file_store();
    let other = FileStore::open(dir.path().join("store")).unwrap();

    store.set("rank0.addr", b"a").unwrap();
    other.wait(&["rank0.addr"], Timeout::from_millis(100)).unwrap();
    assert_eq!(other.get("rank0.addr").unwrap(), b"a");
}

#[test]
fn test_open_is_idempotent() {
    let (dir, _store) = temp_file_store();
    for _ in 0..3 {
        FileStore::open(dir.path().join("store")).unwrap();
    }
}

#[test]
fn test_external_file_is_visible() {
    let (_dir, store) = temp_file_store();
    fs::write(store.path().join("injected"), b"from outside").unwrap();

    store.wait(&["injected"], Timeout::from_millis(0)).unwrap();
    assert_eq!(store.get("injected").unwrap(), b"from outside");
}

#[test]
fn test_externally_removed_key_is_missing() {
    let (_dir, store) = temp_file_store();
    store.set("gone", b"x").unwrap();
    fs::remove_file(store.path().join("gone")).unwrap();

    assert!(store.get("gone").unwrap_err().is_key_not_found());
}

#[test]
fn test_status_failure_aborts_wait() {
    let (_dir, store) = temp_file_store();
    // Replace the directory with a regular file so every stat fails with
    // something other than "not found".
    fs::remove_dir(store.path()).unwrap();
    fs::write(store.path(), b"not a directory").unwrap();

    let start = Instant::now();
    let err = store.wait(&["k"], Timeout::from_millis(2_000)).unwrap_err();

    assert!(matches!(err, Error::Io(_)), "{:?}", err);
    assert!(start.elapsed() < Duration::from_millis(1_000));
}

#[test]
fn test_set_fails_when_directory_vanishes() {
    let (_dir, store) = temp_file_store();
    fs::remove_dir(store.path()).unwrap();

    assert!(store.set("k", b"v").unwrap_err().is_system());
}

#[test]
fn test_many_handles_rendezvous() {
    const RANKS: usize = 6;
    let (dir, _store) = temp_file_store();
    let path = dir.path().join("store");

    let handles: Vec<_> = (0..RANKS)
        .map(|rank| {
            let path = path.clone();
            thread::spawn(move || {
                let store = FileStore::with_poll_interval(&path, Duration::from_millis(1)).unwrap();
                store
                    .set(&format!("rank{}.addr", rank), format!("host{}", rank).as_bytes())
                    .unwrap();

                let keys: Vec<String> = (0..RANKS).map(|r| format!("rank{}.addr", r)).collect();
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                store.wait(&keys, Timeout::from_millis(5_000)).unwrap();
                store.multi_get(&keys).unwrap()
            })
        })
        .collect();

    for h in handles {
        let values = h.join().unwrap();
        for (rank, value) in values.iter().enumerate() {
            assert_eq!(value, format!("host{}", rank).as_bytes());
        }
    }

    let mut files: Vec<_> = fs::read_dir(&path)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    files.sort();
    assert_eq!(files.len(), RANKS, "stray files: {:?}", files);
}
