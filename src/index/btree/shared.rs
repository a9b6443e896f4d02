//! SharedBTree - a B-tree behind a single-writer lock.
//!
//! [`BTree`] itself is not internally synchronized: concurrent inserts
//! would interleave splits. [`SharedBTree`] puts the whole tree behind one
//! `parking_lot::RwLock`, so writers are serialized and readers proceed in
//! parallel whenever no insert is running.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::config::BTreeConfig;
use crate::common::{ListenerId, Result};
use crate::index::btree::{BTree, StatsSnapshot, TreeListener};

/// A [`BTree`] that can be shared between threads (usually via `Arc`).
///
/// # Thread Safety
/// - `insert`, `add_listener`, `remove_listener`: write lock
/// - everything else: read lock
///
/// Listener callbacks run while the write lock is held. A listener must
/// not call back into the same `SharedBTree`, or it will deadlock.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use interchangedb_index::SharedBTree;
///
/// let tree = Arc::new(SharedBTree::new(3));
///
/// let handles: Vec<_> = (0..4)
///     .map(|n| {
///         let tree = Arc::clone(&tree);
///         thread::spawn(move || {
///             for k in 0..25 {
///                 tree.insert(n * 100 + k);
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(tree.len(), 100);
/// assert_eq!(tree.search_cloned(&301), Some(301));
/// ```
pub struct SharedBTree<K> {
    inner: RwLock<BTree<K>>,
}

impl<K: Ord> SharedBTree<K> {
    /// Create an empty shared tree with minimum degree `min_degree`.
    ///
    /// # Panics
    /// Panics if `min_degree < 2` or `min_degree > MAX_MIN_DEGREE`.
    pub fn new(min_degree: usize) -> Self {
        Self::from_tree(BTree::new(min_degree))
    }

    /// # Errors
    /// - `Error::InvalidMinDegree` if `config.min_degree` is below 2 or above
    ///   `MAX_MIN_DEGREE`
    pub fn try_with_config(config: BTreeConfig) -> Result<Self> {
        Ok(Self::from_tree(BTree::try_with_config(config)?))
    }

    /// Wrap an existing tree.
    pub fn from_tree(tree: BTree<K>) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }

    // ========================================================================
    // Writes (exclusive)
    // ========================================================================

    pub fn insert(&self, key: K) {
        self.inner.write().insert(key);
    }

    pub fn add_listener<L>(&self, listener: L) -> ListenerId
    where
        L: TreeListener<K> + 'static,
    {
        self.inner.write().add_listener(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.write().remove_listener(id)
    }

    // ========================================================================
    // Reads (shared)
    // ========================================================================

    /// Search and clone the stored key out from under the lock.
    pub fn search_cloned(&self, key: &K) -> Option<K>
    where
        K: Clone,
    {
        self.inner.read().search(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn height(&self) -> usize {
        self.inner.read().height()
    }

    /// All keys in ascending order, copied under one read lock.
    pub fn snapshot(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.read().iter().cloned().collect()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats().snapshot()
    }

    /// Check structural invariants under a read lock.
    pub fn validate(&self) -> Result<()> {
        self.inner.read().validate()
    }

    // ========================================================================
    // Guards
    // ========================================================================

    /// Hold a read lock for several operations, e.g. a full traversal.
    pub fn read(&self) -> RwLockReadGuard<'_, BTree<K>> {
        self.inner.read()
    }

    /// Hold the write lock for a batch of inserts.
    pub fn write(&self) -> RwLockWriteGuard<'_, BTree<K>> {
        self.inner.write()
    }

    pub fn into_inner(self) -> BTree<K> {
        self.inner.into_inner()
    }
}

impl<K: Ord> Default for SharedBTree<K> {
    fn default() -> Self {
        Self::from_tree(BTree::default())
    }
}

impl<K: Ord> From<BTree<K>> for SharedBTree<K> {
    fn from(tree: BTree<K>) -> Self {
        Self::from_tree(tree)
    }
}
