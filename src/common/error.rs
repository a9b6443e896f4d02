//! Error types for the index crate.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All recoverable errors in the index crate.
///
/// Insertion never fails and a search miss is `None`, so nothing on the hot
/// path returns this type. It covers configuration handed in from outside
/// and the structural checker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The minimum degree is below 2 or above `MAX_MIN_DEGREE`.
    ///
    /// A B-tree with `T < 2` cannot split a full node into two non-empty halves.
    #[error("Invalid minimum degree: {0} (must be in 2..=65536)")]
    InvalidMinDegree(usize),

    /// A structural invariant does not hold.
    ///
    /// Only produced by `BTree::validate`. Seeing this indicates a bug in
    /// the insertion path.
    #[error("Invariant violated at depth {depth}: {reason}")]
    InvariantViolation { depth: usize, reason: String },
}

impl Error {
    pub(crate) fn invariant(depth: usize, reason: impl Into<String>) -> Self {
        Error::InvariantViolation {
            depth,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidMinDegree(1);
        assert_eq!(format!("{}", err), "Invalid minimum degree: 1 (must be in 2..=65536)");

        let err = Error::invariant(2, "keys out of order");
        assert_eq!(
            format!("{}", err),
            "Invariant violated at depth 2: keys out of order"
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<usize> {
            Err(Error::InvalidMinDegree(0))
        }

        assert_eq!(might_fail(), Err(Error::InvalidMinDegree(0)));
    }
}
