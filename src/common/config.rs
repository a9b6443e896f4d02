//! Configuration for B-tree construction.

use crate::common::{Error, Result};

/// Default minimum degree `T`.
///
/// With `T = 3` a node holds at most 5 keys and 6 children. Small enough
/// that splits show up after a handful of inserts, which keeps rendered
/// trees readable.
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// Smallest legal minimum degree.
///
/// `T = 2` gives the classic 2-3-4 tree: 1 to 3 keys per node.
pub const MIN_MIN_DEGREE: usize = 2;

/// Largest accepted minimum degree.
///
/// Every node reserves room for `2T - 1` keys up front, so `T` has to stay
/// far below the point where `2T` overflows or the reservation fails.
pub const MAX_MIN_DEGREE: usize = 1 << 16;

/// When listeners hear about an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// One callback per public `insert`, after all splits it caused.
    #[default]
    Batched,

    /// One callback per split, in the order they happened, then one for the
    /// placement of the key. Still delivered after `insert` has finished
    /// restructuring.
    PerChange,
}

/// Construction-time settings for a [`BTree`](crate::index::btree::BTree).
///
/// # Example
/// ```
/// use interchangedb_index::common::config::{BTreeConfig, NotifyMode};
///
/// let config = BTreeConfig::new(4).with_notify_mode(NotifyMode::PerChange);
/// assert_eq!(config.max_keys(), 7);
/// assert_eq!(config.max_children(), 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTreeConfig {
    /// Minimum degree `T`.
    pub min_degree: usize,

    /// Notification batching.
    pub notify_mode: NotifyMode,
}

impl BTreeConfig {
    /// Create a config with the given minimum degree and batched notifications.
    pub fn new(min_degree: usize) -> Self {
        Self {
            min_degree,
            notify_mode: NotifyMode::Batched,
        }
    }

    pub fn with_min_degree(mut self, min_degree: usize) -> Self {
        self.min_degree = min_degree;
        self
    }

    pub fn with_notify_mode(mut self, notify_mode: NotifyMode) -> Self {
        self.notify_mode = notify_mode;
        self
    }

    /// Maximum keys per node (`2T - 1`).
    #[inline]
    pub fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }

    /// Maximum children per internal node (`2T`).
    #[inline]
    pub fn max_children(&self) -> usize {
        2 * self.min_degree
    }

    /// Minimum keys per non-root node (`T - 1`).
    #[inline]
    pub fn min_keys(&self) -> usize {
        self.min_degree - 1
    }

    /// Check the config without panicking.
    ///
    /// # Errors
    /// - `Error::InvalidMinDegree` if `min_degree` is outside
    ///   `MIN_MIN_DEGREE..=MAX_MIN_DEGREE`
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MIN_DEGREE..=MAX_MIN_DEGREE).contains(&self.min_degree) {
            return Err(Error::InvalidMinDegree(self.min_degree));
        }
        Ok(())
    }
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DEGREE)
    }
}
