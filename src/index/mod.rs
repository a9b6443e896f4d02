//! Index structures.
//!
//! Currently implements:
//! - [`btree`] - In-memory B-tree with proactive splitting

pub mod btree;

pub use btree::{BTree, SharedBTree};
