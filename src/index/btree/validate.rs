//! Structural checker for B-tree invariants.
//!
//! Used by tests and by harnesses that want to assert a tree is well formed
//! after a run of insertions. Not called on any hot path.

use crate::common::{Error, Result};
use crate::index::btree::{BTree, Node};

/// State carried down the recursion.
struct Walk {
    min_degree: usize,
    leaf_depth: Option<usize>,
    keys_seen: usize,
}

impl<K: Ord> BTree<K> {
    /// Check every structural invariant of the tree.
    ///
    /// 1. Every node holds at most `2T - 1` keys; non-root nodes at least `T - 1`
    /// 2. Keys within a node are non-decreasing
    /// 3. Internal nodes have exactly `keys + 1` children, leaves none
    /// 4. Every key in `children[i]` lies between `keys[i - 1]` and `keys[i]`
    /// 5. All leaves sit at the same depth
    /// 6. The key count matches `len()`
    ///
    /// # Errors
    /// - `Error::InvariantViolation` naming the first broken invariant
    pub fn validate(&self) -> Result<()> {
        let mut walk = Walk {
            min_degree: self.min_degree(),
            leaf_depth: None,
            keys_seen: 0,
        };

        validate_node(self.root(), 0, None, None, &mut walk)?;

        if walk.keys_seen != self.len() {
            return Err(Error::invariant(
                0,
                format!("len() is {} but tree holds {} keys", self.len(), walk.keys_seen),
            ));
        }
        Ok(())
    }
}

fn validate_node<K: Ord>(
    node: &Node<K>,
    depth: usize,
    lower: Option<&K>,
    upper: Option<&K>,
    walk: &mut Walk,
) -> Result<()> {
    let t = walk.min_degree;
    let count = node.len();

    if count > 2 * t - 1 {
        return Err(Error::invariant(
            depth,
            format!("{} keys exceeds maximum {}", count, 2 * t - 1),
        ));
    }
    if depth > 0 && count < t - 1 {
        return Err(Error::invariant(
            depth,
            format!("{} keys below minimum {}", count, t - 1),
        ));
    }
    if node.keys().windows(2).any(|w| w[0] > w[1]) {
        return Err(Error::invariant(depth, "keys out of order"));
    }

    // Equal keys may sit on either side of an equal separator.
    let below = |k: &K| lower.is_some_and(|lo| k < lo);
    let above = |k: &K| upper.is_some_and(|hi| k > hi);
    if node.keys().iter().any(|k| below(k) || above(k)) {
        return Err(Error::invariant(depth, "key outside parent separator range"));
    }

    walk.keys_seen += count;

    if node.is_leaf() {
        if !node.children().is_empty() {
            return Err(Error::invariant(depth, "leaf has children"));
        }
        match walk.leaf_depth {
            None => walk.leaf_depth = Some(depth),
            Some(expected) if expected != depth => {
                return Err(Error::invariant(
                    depth,
                    format!("leaf at depth {} but first leaf at depth {}", depth, expected),
                ));
            }
            Some(_) => {}
        }
        return Ok(());
    }

    if node.children().len() != count + 1 {
        return Err(Error::invariant(
            depth,
            format!("{} keys but {} children", count, node.children().len()),
        ));
    }

    for (i, child) in node.children().iter().enumerate() {
        let child_lower = if i == 0 { lower } else { node.keys().get(i - 1) };
        let child_upper = if i == count { upper } else { node.keys().get(i) };
        validate_node(child, depth + 1, child_lower, child_upper, walk)?;
    }
    Ok(())
}
