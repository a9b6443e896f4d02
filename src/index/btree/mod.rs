//! B-tree index implementation.
//!
//! # Components
//! - [`BTree`] - The ordered index: insert, search, in-order traversal
//! - [`Node`] - Fixed-capacity key/child storage
//! - [`Iter`] - Lazy in-order iterator
//! - [`TreeListener`] / [`TreeChange`] - Change notification
//! - [`BTreeStats`] - Operation counters
//! - [`SharedBTree`] - Single-writer, multi-reader wrapper

mod iter;
mod listener;
mod node;
mod shared;
mod stats;
mod tree;
mod validate;

pub use iter::Iter;
pub use listener::{TreeChange, TreeListener};
pub use node::Node;
pub use shared::SharedBTree;
pub use stats::{BTreeStats, StatsSnapshot};
pub use tree::BTree;
