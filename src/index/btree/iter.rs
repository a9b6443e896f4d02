//! In-order traversal.

use std::iter::FusedIterator;

use crate::index::btree::Node;

/// Lazy in-order iterator over the keys of a [`BTree`](super::BTree).
///
/// Holds the path from the root to the next key as a stack of
/// `(node, next key index)` frames. Each call to `BTree::iter` starts a new
/// traversal, so a traversal can always be restarted from scratch.
#[derive(Debug)]
pub struct Iter<'a, K> {
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(root: &'a Node<K>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::with_capacity(root.height() + 1),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    /// Push `node` and its leftmost descendants, ending at a leaf.
    fn push_left_spine(&mut self, mut node: &'a Node<K>) {
        loop {
            self.stack.push((node, 0));
            match node.children().first() {
                Some(first) => node = first,
                None => break,
            }
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        loop {
            let (node, index) = *self.stack.last()?;

            if index < node.len() {
                if let Some(top) = self.stack.last_mut() {
                    top.1 += 1;
                }
                if !node.is_leaf() {
                    // Everything in children[index + 1] sorts after keys[index].
                    self.push_left_spine(&node.children()[index + 1]);
                }
                self.remaining -= 1;
                return Some(&node.keys()[index]);
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

// Derived Clone would require `K: Clone`.
impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
