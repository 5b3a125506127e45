//! Error types for outline storage.

use crate::attribute::{AttributeKey, ValueKind, VocabularyVersion};
use thiserror::Error;

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for storage operations.
///
/// Every failing operation leaves the store exactly as it was before the
/// call. A cache miss is not an error; lookups return `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Character range outside the current text, or with `start > end`.
    #[error("range {start}..{end} out of bounds for text of {len} chars")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    /// Attribute value of the wrong kind (or outside the key's domain).
    #[error("invalid value for `{key}`: expected {expected}, found {found}")]
    InvalidAttributeValue {
        key: AttributeKey,
        expected: ValueKind,
        found: String,
    },
    /// Empty attachment cache key.
    #[error("attachment key must not be empty")]
    InvalidKey,
    /// Name that is neither a canonical key nor a known alias.
    #[error("unknown attribute key: {0}")]
    UnknownKey(String),
    /// Key introduced after the vocabulary version the store accepts.
    #[error("attribute `{key}` requires vocabulary {since}, store accepts {version}")]
    UnsupportedKey {
        key: AttributeKey,
        since: VocabularyVersion,
        version: VocabularyVersion,
    },
}

impl Error {
    pub(crate) fn out_of_bounds(range: &std::ops::Range<usize>, len: usize) -> Self {
        Self::RangeOutOfBounds {
            start: range.start,
            end: range.end,
            len,
        }
    }
}
