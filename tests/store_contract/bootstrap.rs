//! End-to-End Bootstrap Scenarios
//!
//! Simulates a job of several ranks exchanging addresses before connecting.

use crate::*;
use rendezvous::{Rendezvous, StoreBuilder, Timeout};
use std::thread;

const ALL: [&str; 3] = ["rank0.addr", "rank1.addr", "rank2.addr"];

fn addr(rank: usize) -> Vec<u8> {
    format!("10.0.0.{}:{}", rank + 1, 4000 + rank).into_bytes()
}

/// Three ranks publish, wait for all, then read the other two.
fn three_rank_exchange(store: Arc<dyn Store>) {
    let handles: Vec<_> = (0..3)
        .map(|rank| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store.set(ALL[rank], &addr(rank)).unwrap();
                store.wait(&ALL, Duration::from_secs(5).into()).unwrap();

                (0..3)
                    .filter(|peer| *peer != rank)
                    .map(|peer| (peer, store.get(ALL[peer]).unwrap()))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for h in handles {
        for (peer, value) in h.join().unwrap() {
            assert_eq!(value, addr(peer));
        }
    }
}

#[test]
fn test_three_ranks_in_process() {
    three_rank_exchange(hash_store());
}

#[test]
fn test_three_ranks_over_filesystem() {
    let (_dir, store) = temp_file_store();
    three_rank_exchange(store);
}

#[test]
fn test_rendezvous_helper_over_builder_store() {
    const SIZE: usize = 3;
    init_tracing();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("job");

    let handles: Vec<_> = (0..SIZE)
        .map(|rank| {
            let path = path.clone();
            thread::spawn(move || {
                // Each rank configures its own handle, like a separate process
                let store = StoreBuilder::new()
                    .path(&path)
                    .poll_interval(Duration::from_millis(1))
                    .open()
                    .unwrap();
                let rdv = Rendezvous::new(rank, SIZE, store)
                    .unwrap()
                    .with_timeout(Timeout::from_millis(5_000));

                let addrs = rdv.exchange("addr", &addr(rank)).unwrap();
                rdv.barrier("connected").unwrap();
                addrs
            })
        })
        .collect();

    for h in handles {
        let addrs = h.join().unwrap();
        assert_eq!(addrs, (0..SIZE).map(addr).collect::<Vec<_>>());
    }
}

#[test]
fn test_retry_in_fresh_session() {
    let store: Arc<dyn Store> = hash_store();
    let rank0 = Rendezvous::new(0, 2, Arc::clone(&store))
        .unwrap()
        .with_timeout(Timeout::from_millis(20));

    // First attempt: rank 1 never shows up
    let first = rank0.scoped("attempt1");
    assert!(first.exchange("addr", b"old").unwrap_err().is_timeout());

    // Second attempt in a clean key space
    let second = rank0.scoped("attempt2");
    let rank1 = Rendezvous::new(1, 2, Arc::clone(&store))
        .unwrap()
        .scoped("attempt2");
    rank1.publish("addr", b"peer").unwrap();

    let addrs = second.exchange("addr", b"new").unwrap();
    assert_eq!(addrs, vec![b"new".to_vec(), b"peer".to_vec()]);
    assert_eq!(store.get("attempt1.rank0.addr").unwrap(), b"old");
}
