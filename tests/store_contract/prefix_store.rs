//! Prefix Decorator Tests
//!
//! Isolation between prefixes and equivalence of the generic fallback.

use crate::*;
use proptest::prelude::*;
use rendezvous::{PrefixStore, Timeout};

#[test]
fn test_same_logical_key_different_sessions() {
    for_each_backend(|name, store| {
        let a = PrefixStore::new("a.", Arc::clone(&store));
        let b = PrefixStore::new("b.", Arc::clone(&store));

        a.set("x", b"1").unwrap();
        assert!(b.get("x").unwrap_err().is_key_not_found(), "{}", name);
        assert!(b.wait(&["x"], Timeout::from_millis(5)).unwrap_err().is_timeout());
        assert_eq!(store.get("a.x").unwrap(), b"1");
    });
}

#[test]
fn test_capability_is_forwarded() {
    let hash = hash_store();
    assert!(PrefixStore::new("p.", hash).has_v2_support());

    let (_dir, file) = temp_file_store();
    assert!(!PrefixStore::new("p.", file).has_v2_support());
}

#[test]
fn test_fallback_equivalence_on_file_backend() {
    let (_dir, store) = temp_file_store();
    let prefixed = PrefixStore::new("job.", Arc::clone(&store));

    prefixed
        .multi_set(&["a", "b"], &[b"v1".as_slice(), b"v2".as_slice()])
        .unwrap();

    assert_eq!(store.get("job.a").unwrap(), b"v1");
    assert_eq!(store.get("job.b").unwrap(), b"v2");
    assert_eq!(
        prefixed.multi_get(&["a", "b"]).unwrap(),
        vec![b"v1".to_vec(), b"v2".to_vec()]
    );
}

#[test]
fn test_counter_through_decorator_matches_direct() {
    for_each_backend(|name, store| {
        let prefixed = PrefixStore::new("c.", Arc::clone(&store));
        prefixed.add("n", 5).unwrap();
        prefixed.add("n", 3).unwrap();

        // Continue on the physical key directly
        assert_eq!(store.add("c.n", 1).unwrap(), 9, "{}", name);
    });
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_distinct_prefixes_never_collide(
        key in key_strategy(),
        va in proptest::collection::vec(any::<u8>(), 0..64),
        vb in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let backing = hash_store();
        let a = PrefixStore::new("a.", Arc::clone(&backing));
        let b = PrefixStore::new("b.", Arc::clone(&backing));

        a.set(&key, &va).unwrap();
        prop_assert!(b.get(&key).unwrap_err().is_key_not_found());

        b.set(&key, &vb).unwrap();
        prop_assert_eq!(a.get(&key).unwrap(), va);
        prop_assert_eq!(b.get(&key).unwrap(), vb);
        prop_assert_eq!(backing.len(), 2);
    }

    #[test]
    fn prop_fallback_multi_set_matches_sequential_sets(
        entries in proptest::collection::btree_map(key_strategy(), proptest::collection::vec(any::<u8>(), 0..32), 1..8),
    ) {
        let (_dir, one) = temp_file_store();
        let (_dir2, two) = temp_file_store();

        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        let values: Vec<&[u8]> = entries.values().map(Vec::as_slice).collect();
        PrefixStore::new("p.", Arc::clone(&one)).multi_set(&keys, &values).unwrap();
        for (key, value) in &entries {
            two.set(&format!("p.{}", key), value).unwrap();
        }

        for key in entries.keys() {
            let physical = format!("p.{}", key);
            prop_assert_eq!(one.get(&physical).unwrap(), two.get(&physical).unwrap());
        }
    }
}
