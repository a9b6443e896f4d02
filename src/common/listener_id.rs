//! Listener identifier type.

use std::fmt;

/// Identifies a registered change listener.
///
/// Handed out by `BTree::add_listener` and used to unregister later.
/// Ids are never reused within one tree.
///
/// # Example
/// ```
/// use interchangedb_index::ListenerId;
///
/// let id = ListenerId::new(5);
/// assert_eq!(id.0, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl ListenerId {
    /// Create a new ListenerId.
    #[inline]
    pub fn new(id: u64) -> Self {
        ListenerId(id)
    }

    /// The id that follows this one.
    #[inline]
    pub(crate) fn next(self) -> Self {
        ListenerId(self.0 + 1)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}
