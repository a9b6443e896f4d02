//! BTree - the ordered index and its split-on-the-way-down insertion.
//!
//! Insertion never enters a full node. A full child is split before the
//! descent reaches it, so a single downward pass always finds room and
//! nothing has to be fixed up on the way back. The root is the one node
//! that cannot be split from above; when it is full the tree first grows a
//! new empty root over it and then splits it like any other child.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, trace, warn};

use crate::common::config::{BTreeConfig, NotifyMode, MAX_MIN_DEGREE, MIN_MIN_DEGREE};
use crate::common::{ListenerId, Result};
use crate::index::btree::listener::ListenerRegistry;
use crate::index::btree::{BTreeStats, Iter, Node, TreeChange, TreeListener};

/// An in-memory B-tree over keys of type `K`.
///
/// # Structure
/// ```text
///                      [ 20 | 40 ]                 ← root (may hold < T-1 keys)
///                     /     |     \
///          [ 5 | 10 ]   [ 25 | 30 ]   [ 50 | 60 ]  ← T-1 ..= 2T-1 keys each
/// ```
///
/// # Duplicates
/// Equal keys are kept as separate entries. `search` returns the first one
/// met on the way down.
///
/// # Thread Safety
/// `insert` takes `&mut self`; `search` and `iter` take `&self`. Any number
/// of readers may share a tree across threads. For a shared tree that also
/// takes writes, see [`SharedBTree`](super::SharedBTree).
///
/// # Example
/// ```
/// use interchangedb_index::BTree;
///
/// let mut tree = BTree::new(3);
/// for k in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(k);
/// }
///
/// assert_eq!(tree.search(&6), Some(&6));
/// assert_eq!(tree.search(&15), None);
///
/// let sorted: Vec<i32> = tree.iter().copied().collect();
/// assert_eq!(sorted, vec![5, 6, 7, 10, 12, 17, 20, 30]);
/// ```
pub struct BTree<K> {
    /// Sole entry point. Starts as an empty leaf.
    pub(super) root: Node<K>,

    /// Immutable after construction.
    config: BTreeConfig,

    /// Total number of keys.
    pub(super) len: usize,

    /// Change listeners, in registration order.
    listeners: ListenerRegistry<K>,

    /// Operation counters.
    stats: BTreeStats,
}

/// Record of what one `insert` did, turned into notifications at the end.
#[derive(Default)]
struct InsertTrace {
    /// Parent depth of each split, in the order they happened.
    split_depths: Vec<usize>,
    root_split: bool,
}

impl InsertTrace {
    fn changes(&self, mode: NotifyMode) -> Vec<TreeChange> {
        let inserted = TreeChange::Inserted {
            splits: self.split_depths.len(),
            root_split: self.root_split,
        };

        match mode {
            NotifyMode::Batched => vec![inserted],
            NotifyMode::PerChange => self
                .split_depths
                .iter()
                .map(|&depth| TreeChange::Split { depth })
                .chain(std::iter::once(inserted))
                .collect(),
        }
    }
}

impl<K> BTree<K> {
    // ========================================================================
    // Read-only accessors
    // ========================================================================

    /// The root node, for rendering and inspection.
    #[inline]
    pub fn root(&self) -> &Node<K> {
        &self.root
    }

    #[inline]
    pub fn config(&self) -> &BTreeConfig {
        &self.config
    }

    /// Minimum degree `T`.
    #[inline]
    pub fn min_degree(&self) -> usize {
        self.config.min_degree
    }

    /// Number of keys, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of edges between the root and any leaf. A lone root is 0.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Operation counters.
    pub fn stats(&self) -> &BTreeStats {
        &self.stats
    }

    /// All keys in ascending order.
    ///
    /// The iterator is lazy; calling `iter` again starts over.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root, self.len)
    }

    /// Same as [`iter`](Self::iter).
    pub fn traverse(&self) -> Iter<'_, K> {
        self.iter()
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Register a listener. It will be called after every `insert`.
    pub fn add_listener<L>(&mut self, listener: L) -> ListenerId
    where
        L: TreeListener<K> + 'static,
    {
        let id = self.listeners.register(Box::new(listener));
        debug!("registered {} ({} total)", id, self.listeners.len());
        id
    }

    /// Unregister a listener. Returns `false` if `id` was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.unregister(id);
        if removed {
            debug!("removed {} ({} left)", id, self.listeners.len());
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `changes` to every listener, change by change, in
    /// registration order.
    ///
    /// A listener panic is re-raised once the registry is back in place, so
    /// the tree keeps every listener it had.
    fn notify(&mut self, changes: &[TreeChange]) {
        let mut entries = self.listeners.take();
        let delivered = {
            let tree = &*self;
            panic::catch_unwind(AssertUnwindSafe(|| {
                for change in changes {
                    for (_, listener) in entries.iter_mut() {
                        listener.on_tree_changed(tree, change);
                        tree.stats.record_notification();
                    }
                }
            }))
        };
        self.listeners.restore(entries);

        if let Err(payload) = delivered {
            warn!("listener panicked, re-raising after restoring listeners");
            panic::resume_unwind(payload);
        }
    }
}

impl<K: Ord> BTree<K> {
    /// Create an empty tree with minimum degree `min_degree` and batched
    /// notifications.
    ///
    /// # Panics
    /// Panics if `min_degree < 2`.
    pub fn new(min_degree: usize) -> Self {
        Self::with_config(BTreeConfig::new(min_degree))
    }

    /// Create an empty tree from a full config.
    ///
    /// # Panics
    /// Panics if `config.min_degree < 2` or `config.min_degree > MAX_MIN_DEGREE`.
    pub fn with_config(config: BTreeConfig) -> Self {
        assert!(
            config.min_degree >= MIN_MIN_DEGREE,
            "min_degree must be >= {}",
            MIN_MIN_DEGREE
        );
        assert!(
            config.min_degree <= MAX_MIN_DEGREE,
            "min_degree must be <= {}",
            MAX_MIN_DEGREE
        );

        Self {
            root: Node::new(true, config.min_degree),
            config,
            len: 0,
            listeners: ListenerRegistry::new(),
            stats: BTreeStats::new(),
        }
    }

    /// Like [`with_config`](Self::with_config), for configs that come from
    /// outside the program.
    ///
    /// # Errors
    /// - `Error::InvalidMinDegree` if `config.min_degree` is below 2 or above
    ///   `MAX_MIN_DEGREE`
    pub fn try_with_config(config: BTreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Find a key equal to `key`.
    ///
    /// Returns the stored key, which may be a different (but equal) value
    /// from the one passed in.
    pub fn search(&self, key: &K) -> Option<&K> {
        let mut node = &self.root;
        let found = loop {
            // First slot whose key is not less than `key`.
            let i = node.keys().partition_point(|k| k < key);

            if let Some(candidate) = node.keys().get(i) {
                if candidate == key {
                    break Some(candidate);
                }
            }
            if node.is_leaf() {
                break None;
            }
            node = &node.children()[i];
        };

        self.stats.record_search(found.is_some());
        found
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Insert `key`. Never fails; equal keys are kept side by side.
    ///
    /// Listeners are notified once the tree is consistent again.
    pub fn insert(&mut self, key: K) {
        let t = self.config.min_degree;
        let mut trace = InsertTrace::default();

        if self.root.is_full(t) {
            self.root.push_down(t);
            split_child(&mut self.root, 0, t, 0, &mut trace);
            trace.root_split = true;
            debug!("root split, height now {}", self.root.height());
        }
        insert_non_full(&mut self.root, key, t, 0, &mut trace);

        self.len += 1;
        self.stats
            .record_insert(trace.split_depths.len(), trace.root_split);

        if !self.listeners.is_empty() {
            let changes = trace.changes(self.config.notify_mode);
            self.notify(&changes);
        }
    }
}

/// Split the full child `parent.children[i]`, promoting its median into
/// `parent.keys[i]` and placing the new sibling at `parent.children[i + 1]`.
///
/// `parent` must not be full.
fn split_child<K>(
    parent: &mut Node<K>,
    i: usize,
    t: usize,
    depth: usize,
    trace: &mut InsertTrace,
) {
    debug_assert!(!parent.is_full(t));

    let (median, sibling) = parent.child_mut(i).split_upper(t);
    parent.insert_key(i, median);
    parent.insert_child(i + 1, sibling);

    trace!("split child {} under depth {}", i, depth);
    trace.split_depths.push(depth);
}

/// Insert into the subtree rooted at `node`, which must not be full.
fn insert_non_full<K: Ord>(
    node: &mut Node<K>,
    key: K,
    t: usize,
    depth: usize,
    trace: &mut InsertTrace,
) {
    // After any keys equal to `key`.
    let mut i = node.keys().partition_point(|k| k <= &key);

    if node.is_leaf() {
        node.insert_key(i, key);
        return;
    }

    if node.children()[i].is_full(t) {
        split_child(node, i, t, depth, trace);
        if key > node.keys()[i] {
            i += 1;
        }
    }
    insert_non_full(node.child_mut(i), key, t, depth + 1, trace);
}

impl<K: Ord> Default for BTree<K> {
    fn default() -> Self {
        Self::with_config(BTreeConfig::default())
    }
}

impl<K: Ord> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for BTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = BTree::default();
        tree.extend(iter);
        tree
    }
}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K: fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("config", &self.config)
            .field("len", &self.len)
            .field("listeners", &self.listeners.len())
            .field("root", &self.root)
            .finish()
    }
}

/// Renders one node per line, indented by depth.
///
/// ```text
/// [6, 12]
///   [1, 2, 5]
///   [7, 10]
///   [20, 30]
/// ```
impl<K: fmt::Debug> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render<K: fmt::Debug>(
            node: &Node<K>,
            depth: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            writeln!(f, "{:indent$}{:?}", "", node.keys(), indent = depth * 2)?;
            for child in node.children() {
                render(child, depth + 1, f)?;
            }
            Ok(())
        }

        render(&self.root, 0, f)
    }
}
