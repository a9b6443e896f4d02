//! B-tree behaviour tests.
//!
//! Insert/search/traverse scenarios, structural checks across minimum
//! degrees, and listener delivery.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use interchangedb_index::{BTree, BTreeConfig, NotifyMode, TreeChange};

const MIXED_KEYS: [i32; 19] = [
    10, 20, 5, 6, 12, 30, 7, 1, 742, 2, 3, 70, 82, 80, 21, 19, 20, 5, 11,
];

fn tree_with(min_degree: usize, keys: &[i32]) -> BTree<i32> {
    let mut tree = BTree::new(min_degree);
    for &k in keys {
        tree.insert(k);
    }
    tree
}

fn collect(tree: &BTree<i32>) -> Vec<i32> {
    tree.iter().copied().collect()
}

// ============================================================================
// Insert / search / traverse
// ============================================================================

#[test]
fn test_insert_and_search_for_value() {
    let tree = tree_with(3, &[10]);
    assert_eq!(tree.search(&10), Some(&10));
}

#[test]
fn test_search_for_non_existent_value() {
    let tree: BTree<i32> = BTree::new(3);
    assert_eq!(tree.search(&10), None);
}

#[test]
fn test_insert_duplicate_value() {
    let tree = tree_with(3, &[10, 10]);
    assert_eq!(tree.search(&10), Some(&10));
    assert_eq!(tree.len(), 2);
    assert_eq!(collect(&tree), vec![10, 10]);
}

#[test]
fn test_insert_and_traverse_values() {
    let tree = tree_with(3, &MIXED_KEYS);

    let keys = collect(&tree);
    assert_eq!(keys.len(), MIXED_KEYS.len());
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));

    let mut expected = MIXED_KEYS.to_vec();
    expected.sort();
    assert_eq!(keys, expected);
}

#[test]
fn test_negative_lookup_outside_inserted_set() {
    for t in 2..=5 {
        let tree = tree_with(t, &MIXED_KEYS);
        assert_eq!(tree.search(&999), None, "T = {}", t);
        for k in MIXED_KEYS {
            assert_eq!(tree.search(&k), Some(&k), "T = {}", t);
        }
    }
}

#[test]
fn test_string_keys() {
    let mut tree = BTree::new(2);
    for word in ["pear", "apple", "fig", "kiwi", "banana", "cherry", "date"] {
        tree.insert(word.to_string());
    }

    assert_eq!(tree.search(&"kiwi".to_string()).map(String::as_str), Some("kiwi"));
    assert!(!tree.contains(&"mango".to_string()));

    let words: Vec<&str> = tree.iter().map(String::as_str).collect();
    assert_eq!(
        words,
        vec!["apple", "banana", "cherry", "date", "fig", "kiwi", "pear"]
    );
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_capacity_invariant_across_degrees() {
    for t in 2..=8 {
        let mut tree = BTree::new(t);
        for k in 0..2_000 {
            tree.insert((k * 7_919) % 3_001);
            if k % 97 == 0 {
                tree.validate().unwrap();
            }
        }
        tree.validate().unwrap();
        assert_eq!(tree.len(), 2_000);
    }
}

#[test]
fn test_ascending_and_descending_inserts_stay_valid() {
    for t in [2, 3, 16] {
        let ascending = tree_with(t, &(0..1_000).collect::<Vec<_>>());
        let descending = tree_with(t, &(0..1_000).rev().collect::<Vec<_>>());

        ascending.validate().unwrap();
        descending.validate().unwrap();
        assert_eq!(collect(&ascending), collect(&descending));
    }
}

#[test]
fn test_first_root_split_at_two_t() {
    for t in 2..=6 {
        let mut tree = BTree::new(t);
        for k in 0..(2 * t - 1) as i32 {
            tree.insert(k);
        }
        assert_eq!(tree.height(), 0, "T = {}", t);
        assert_eq!(tree.root().len(), 2 * t - 1);

        tree.insert(1_000);
        assert_eq!(tree.height(), 1, "T = {}", t);
        assert_eq!(tree.root().len(), 1);
        for child in tree.root().children() {
            assert!(child.len() >= t - 1);
        }
    }
}

#[test]
fn test_height_grows_one_level_at_a_time() {
    let mut tree = BTree::new(2);
    let mut height = 0;

    for k in 0..5_000 {
        tree.insert(k);
        let now = tree.height();
        assert!(now == height || now == height + 1);
        height = now;
    }

    assert_eq!(tree.stats().snapshot().root_splits as usize, tree.height());
}

#[test]
fn test_height_within_logarithmic_bound() {
    for t in [2usize, 3, 5] {
        let mut tree = BTree::new(t);
        for n in 1..=3_000usize {
            tree.insert(n as i64 * 31 % 1_009);
            let bound = ((n as f64 + 1.0) / 2.0).log(t as f64);
            assert!(
                tree.height() as f64 <= bound + 1e-9,
                "T = {}, n = {}, height = {}",
                t,
                n,
                tree.height()
            );
        }
    }
}

#[test]
fn test_read_only_accessors_expose_structure() {
    let tree = tree_with(2, &(1..=10).collect::<Vec<_>>());
    let root = tree.root();

    assert!(!root.is_leaf());
    assert_eq!(root.children().len(), root.keys().len() + 1);

    let mut leaf_keys = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_leaf() {
            assert!(node.children().is_empty());
            leaf_keys += node.len();
        }
        stack.extend(node.children());
    }
    let internal_keys: usize = 10 - leaf_keys;
    assert!(internal_keys >= 1);
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn test_batched_one_callback_per_insert() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut tree = BTree::with_config(BTreeConfig::new(2));
    tree.add_listener(move |_: &BTree<i32>, change: &TreeChange| {
        assert!(matches!(change, TreeChange::Inserted { .. }));
        counter.fetch_add(1, Ordering::Relaxed);
    });

    for k in 0..500 {
        let before = calls.load(Ordering::Relaxed);
        tree.insert(k);
        assert_eq!(calls.load(Ordering::Relaxed), before + 1);
    }

    let stats = tree.stats().snapshot();
    assert!(stats.splits > 0);
    assert_eq!(stats.notifications, 500);
}

#[test]
fn test_per_change_reports_each_split() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let config = BTreeConfig::new(2).with_notify_mode(NotifyMode::PerChange);
    let mut tree = BTree::with_config(config);
    tree.add_listener(move |_: &BTree<i32>, change: &TreeChange| {
        sink.lock().push(*change);
    });

    for k in 1..=4 {
        tree.insert(k);
    }

    let events = events.lock();
    assert_eq!(
        events.as_slice(),
        &[
            TreeChange::Inserted { splits: 0, root_split: false },
            TreeChange::Inserted { splits: 0, root_split: false },
            TreeChange::Inserted { splits: 0, root_split: false },
            TreeChange::Split { depth: 0 },
            TreeChange::Inserted { splits: 1, root_split: true },
        ]
    );
}

#[test]
fn test_per_change_split_count_matches_stats() {
    let splits_seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&splits_seen);

    let config = BTreeConfig::new(3).with_notify_mode(NotifyMode::PerChange);
    let mut tree = BTree::with_config(config);
    tree.add_listener(move |_: &BTree<i32>, change: &TreeChange| {
        if let TreeChange::Split { .. } = change {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    });

    for k in 0..1_000 {
        tree.insert((k * 37) % 1_000);
    }

    assert_eq!(
        splits_seen.load(Ordering::Relaxed) as u64,
        tree.stats().snapshot().splits
    );
}

#[test]
fn test_listeners_called_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut tree = BTree::new(3);
    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        tree.add_listener(move |_: &BTree<i32>, _: &TreeChange| {
            order.lock().push(name);
        });
    }

    tree.insert(1);
    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

#[test]
fn test_listener_sees_completed_tree() {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);

    let mut tree = BTree::new(2);
    tree.add_listener(move |tree: &BTree<i32>, _: &TreeChange| {
        assert!(tree.validate().is_ok());
        sink.lock().push(tree.len());
    });

    for k in 0..20 {
        tree.insert(k);
    }

    assert_eq!(*observed.lock(), (1..=20).collect::<Vec<_>>());
}

#[test]
fn test_remove_listener_stops_delivery() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut tree = BTree::new(3);
    let id = tree.add_listener(move |_: &BTree<i32>, _: &TreeChange| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    tree.insert(1);
    assert!(tree.remove_listener(id));
    assert!(!tree.remove_listener(id));
    tree.insert(2);

    assert_eq!(calls.load(Ordering::Relaxed), 1);
    assert_eq!(tree.listener_count(), 0);
}

#[test]
fn test_search_and_traverse_do_not_notify() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut tree = tree_with(2, &[1, 2, 3, 4, 5]);
    tree.add_listener(move |_: &BTree<i32>, _: &TreeChange| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    tree.search(&3);
    tree.search(&42);
    let _ = collect(&tree);
    let _ = tree.traverse().count();

    assert_eq!(calls.load(Ordering::Relaxed), 0);
}

#[test]
#[should_panic(expected = "listener failed")]
fn test_listener_panic_propagates() {
    let mut tree = BTree::new(2);
    tree.add_listener(|_: &BTree<i32>, _: &TreeChange| {
        panic!("listener failed");
    });
    tree.insert(1);
}

#[test]
fn test_listeners_survive_a_panicking_listener() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let armed = Arc::new(AtomicBool::new(true));
    let trigger = Arc::clone(&armed);

    let mut tree = BTree::new(2);
    tree.add_listener(move |_: &BTree<i32>, _: &TreeChange| {
        if trigger.swap(false, Ordering::Relaxed) {
            panic!("listener failed once");
        }
    });
    tree.add_listener(move |_: &BTree<i32>, _: &TreeChange| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let result = panic::catch_unwind(AssertUnwindSafe(|| tree.insert(1)));
    assert!(result.is_err());
    assert_eq!(tree.listener_count(), 2);
    assert_eq!(tree.len(), 1);
    assert_eq!(calls.load(Ordering::Relaxed), 0);

    tree.insert(2);
    assert_eq!(calls.load(Ordering::Relaxed), 1);
    assert_eq!(tree.listener_count(), 2);
    tree.validate().unwrap();
}
