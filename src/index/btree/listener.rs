//! Change notification for B-tree mutations.
//!
//! Listeners are called after an `insert` has finished restructuring the
//! tree, in registration order. Search and traversal never notify.
//!
//! A panicking listener is not caught. The panic unwinds out of `insert`,
//! but only after the registry has been put back, so every listener stays
//! registered and later inserts notify them as usual.

use crate::common::ListenerId;
use crate::index::btree::BTree;

/// What changed in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeChange {
    /// A full node was split and its median promoted into a parent at
    /// `depth` (the root is depth 0). Only sent in `NotifyMode::PerChange`.
    Split { depth: usize },

    /// One `insert` call completed.
    Inserted {
        /// Splits performed while descending, root split included.
        splits: usize,

        /// Whether the tree grew a level.
        root_split: bool,
    },
}

/// Receives [`TreeChange`]s from a tree.
///
/// Implemented for any `FnMut(&BTree<K>, &TreeChange)` closure that is
/// `Send + Sync`, so the tree stays shareable across threads for readers.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use interchangedb_index::{BTree, TreeChange};
///
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
///
/// let mut tree: BTree<i32> = BTree::new(3);
/// tree.add_listener(move |_tree: &BTree<i32>, _change: &TreeChange| {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
///
/// tree.insert(1);
/// tree.insert(2);
/// assert_eq!(seen.load(Ordering::Relaxed), 2);
/// ```
pub trait TreeListener<K>: Send + Sync {
    fn on_tree_changed(&mut self, tree: &BTree<K>, change: &TreeChange);
}

impl<K, F> TreeListener<K> for F
where
    F: FnMut(&BTree<K>, &TreeChange) + Send + Sync,
{
    fn on_tree_changed(&mut self, tree: &BTree<K>, change: &TreeChange) {
        self(tree, change)
    }
}

type Entry<K> = (ListenerId, Box<dyn TreeListener<K>>);

/// Ordered registry of listeners.
pub(crate) struct ListenerRegistry<K> {
    /// Kept in registration order.
    entries: Vec<Entry<K>>,

    /// Next id to hand out. Ids are never reused.
    next_id: ListenerId,
}

impl<K> ListenerRegistry<K> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: ListenerId::new(0),
        }
    }

    pub(crate) fn register(&mut self, listener: Box<dyn TreeListener<K>>) -> ListenerId {
        let id = self.next_id;
        self.next_id = id.next();
        self.entries.push((id, listener));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub(crate) fn unregister(&mut self, id: ListenerId) -> bool {
        match self.entries.iter().position(|(lid, _)| *lid == id) {
            Some(pos) => {
                // `remove`, not `swap_remove`: delivery order must survive.
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take the listeners out so they can be called with a shared borrow of
    /// the tree. Must be paired with [`restore`](Self::restore).
    pub(crate) fn take(&mut self) -> Vec<Entry<K>> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn restore(&mut self, entries: Vec<Entry<K>>) {
        debug_assert!(self.entries.is_empty());
        self.entries = entries;
    }
}
