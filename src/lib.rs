//! InterchangeDB index - an in-memory B-tree with proactive node splitting.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      interchangedb-index                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │          SharedBTree (index/btree/shared.rs)             │   │
//! │  │        RwLock: one writer, many concurrent readers       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              BTree (index/btree/tree.rs)                 │   │
//! │  │   insert (split before descent) │ search │ iter          │   │
//! │  │   ┌───────────────┐  ┌───────────────┐  ┌────────────┐  │   │
//! │  │   │  listeners    │  │  BTreeStats   │  │  validate  │  │   │
//! │  │   └───────────────┘  └───────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Node (index/btree/node.rs)                  │   │
//! │  │     keys: ≤ 2T-1, children: keys+1 (internal) or 0       │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (config, Error, ListenerId)
//! - [`index`] - Index structures (B-tree)
//!
//! # Quick Start
//! ```
//! use interchangedb_index::{BTree, BTreeConfig, NotifyMode, TreeChange};
//!
//! let config = BTreeConfig::new(2).with_notify_mode(NotifyMode::Batched);
//! let mut tree = BTree::with_config(config);
//!
//! tree.add_listener(|tree: &BTree<u32>, change: &TreeChange| {
//!     if let TreeChange::Inserted { root_split: true, .. } = change {
//!         println!("tree grew to height {}", tree.height());
//!     }
//! });
//!
//! for k in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(k);
//! }
//!
//! assert_eq!(tree.search(&12), Some(&12));
//! let keys: Vec<u32> = tree.iter().copied().collect();
//! assert!(keys.windows(2).all(|w| w[0] <= w[1]));
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{
    BTreeConfig, NotifyMode, DEFAULT_MIN_DEGREE, MAX_MIN_DEGREE, MIN_MIN_DEGREE,
};
pub use common::{Error, ListenerId, Result};

pub use index::btree::{
    BTree, BTreeStats, Iter, Node, SharedBTree, StatsSnapshot, TreeChange, TreeListener,
};
