//! Node - a fixed-capacity run of keys plus child subtrees.
//!
//! A [`Node`] only knows how to store and shift things. Every decision that
//! needs a key comparison lives in the tree.
//!
//! # Layout
//! ```text
//!            keys:     [ k0 | k1 | k2 ]
//!            children: [c0 | c1 | c2 | c3]
//!
//!   c0 < k0 <= c1 <= k1 <= c2 <= k2 <= c3
//! ```
//! Leaves have no children. Internal nodes always have `keys + 1` children.

/// A node in the B-tree.
///
/// Capacity is reserved up front for `2T - 1` keys and, if internal, `2T`
/// children, so inserting into a non-full node never reallocates.
#[derive(Debug, Clone)]
pub struct Node<K> {
    /// Sorted keys.
    keys: Vec<K>,

    /// Owned subtrees. Empty for leaves.
    children: Vec<Node<K>>,

    /// Fixed at construction.
    is_leaf: bool,
}

impl<K> Node<K> {
    /// Create an empty node with room for a full complement of keys.
    pub(crate) fn new(is_leaf: bool, min_degree: usize) -> Self {
        let children = if is_leaf {
            Vec::new()
        } else {
            Vec::with_capacity(2 * min_degree)
        };

        Self {
            keys: Vec::with_capacity(2 * min_degree - 1),
            children,
            is_leaf,
        }
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    /// The keys stored in this node, ascending.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The child subtrees. Empty for a leaf.
    #[inline]
    pub fn children(&self) -> &[Node<K>] {
        &self.children
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    /// Number of keys in this node (not the subtree).
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Distance from this node down to its leaves.
    ///
    /// All leaves sit at the same depth, so the leftmost spine is enough.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self;
        while let Some(first) = node.children.first() {
            node = first;
            height += 1;
        }
        height
    }

    // ========================================================================
    // Storage mechanics (used by the tree)
    // ========================================================================

    /// Whether the node holds `2T - 1` keys.
    #[inline]
    pub(crate) fn is_full(&self, min_degree: usize) -> bool {
        self.keys.len() == 2 * min_degree - 1
    }

    #[inline]
    pub(crate) fn child_mut(&mut self, index: usize) -> &mut Node<K> {
        &mut self.children[index]
    }

    /// Place `key` at `index`, shifting everything above it right by one.
    #[inline]
    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    /// Place `child` at `index`, shifting later children right by one.
    #[inline]
    pub(crate) fn insert_child(&mut self, index: usize, child: Node<K>) {
        debug_assert!(!self.is_leaf, "leaf nodes have no children");
        self.children.insert(index, child);
    }

    /// Move the upper half of a full node into a new sibling.
    ///
    /// Keys `T..2T-1` (and children `T..2T` if internal) go to the sibling,
    /// the median key at `T - 1` is returned for the parent, and `self`
    /// keeps the lower `T - 1` keys.
    ///
    /// # Panics
    /// Panics if the node is not full.
    pub(crate) fn split_upper(&mut self, min_degree: usize) -> (K, Node<K>) {
        assert!(self.is_full(min_degree), "only a full node can be split");

        let mut sibling = Node::new(self.is_leaf, min_degree);
        sibling.keys.extend(self.keys.drain(min_degree..));
        if !self.is_leaf {
            sibling.children.extend(self.children.drain(min_degree..));
        }

        let median = self.keys.remove(min_degree - 1);
        (median, sibling)
    }

    /// Replace `self` with a fresh internal node whose only child is the old
    /// `self`. This is how the root grows a level.
    pub(crate) fn push_down(&mut self, min_degree: usize) {
        let old = std::mem::replace(self, Node::new(false, min_degree));
        self.children.push(old);
    }
}
