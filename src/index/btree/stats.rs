//! B-tree operation statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters tracked by a [`BTree`](super::BTree).
///
/// Atomic so that `search`, which only borrows the tree shared, can still
/// count. All loads and stores use `Ordering::Relaxed`; the counters are
/// independent of each other and of the tree contents.
///
/// # Example
/// ```
/// use interchangedb_index::BTree;
///
/// let mut tree = BTree::new(2);
/// for k in 0..4 {
///     tree.insert(k);
/// }
/// assert!(tree.search(&2).is_some());
///
/// let snapshot = tree.stats().snapshot();
/// assert_eq!(snapshot.inserts, 4);
/// assert_eq!(snapshot.root_splits, 1);
/// assert_eq!(snapshot.search_hits, 1);
/// ```
#[derive(Debug)]
pub struct BTreeStats {
    /// Number of completed `insert` calls.
    pub inserts: AtomicU64,

    /// Number of node splits, root splits included.
    pub splits: AtomicU64,

    /// Number of times the root split and the tree grew a level.
    pub root_splits: AtomicU64,

    /// Number of `search` calls.
    pub searches: AtomicU64,

    /// Number of `search` calls that found the key.
    pub search_hits: AtomicU64,

    /// Number of listener callbacks delivered.
    pub notifications: AtomicU64,
}

impl BTreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            inserts: AtomicU64::new(0),
            splits: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
            searches: AtomicU64::new(0),
            search_hits: AtomicU64::new(0),
            notifications: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_insert(&self, splits: usize, root_split: bool) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.splits.fetch_add(splits as u64, Ordering::Relaxed);
        if root_split {
            self.root_splits.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_search(&self, hit: bool) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.search_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_notification(&self) {
        self.notifications.fetch_add(1, Ordering::Relaxed);
    }

    /// Search hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        self.snapshot().hit_rate()
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            splits: self.splits.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            search_hits: self.search_hits.load(Ordering::Relaxed),
            notifications: self.notifications.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.inserts.store(0, Ordering::Relaxed);
        self.splits.store(0, Ordering::Relaxed);
        self.root_splits.store(0, Ordering::Relaxed);
        self.searches.store(0, Ordering::Relaxed);
        self.search_hits.store(0, Ordering::Relaxed);
        self.notifications.store(0, Ordering::Relaxed);
    }
}

impl Default for BTreeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`BTreeStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub inserts: u64,
    pub splits: u64,
    pub root_splits: u64,
    pub searches: u64,
    pub search_hits: u64,
    pub notifications: u64,
}

impl StatsSnapshot {
    /// Search hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        if self.searches == 0 {
            0.0
        } else {
            self.search_hits as f64 / self.searches as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, splits: {}, root_splits: {}, searches: {}, search_hits: {}, hit_rate: {:.2}%, notifications: {} }}",
            self.inserts,
            self.splits,
            self.root_splits,
            self.searches,
            self.search_hits,
            self.hit_rate() * 100.0,
            self.notifications
        )
    }
}
