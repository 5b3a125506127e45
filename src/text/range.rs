//! Attribute ranges over the stored text.

use crate::attribute::{AttributeKey, AttributeValue};
use std::ops::Range;

/// A key/value pair applied to a half-open char range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributedRange {
    /// Attribute key.
    pub key: AttributeKey,
    /// Value carried over the range.
    pub value: AttributeValue,
    /// Char range in the stored text.
    pub range: Range<usize>,
}

impl AttributedRange {
    /// Create a new attributed range.
    #[must_use]
    pub fn new(key: AttributeKey, value: AttributeValue, range: Range<usize>) -> Self {
        Self { key, value, range }
    }

    /// Check if this range overlaps a char range.
    #[must_use]
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        self.range.start < range.end && range.start < self.range.end
    }

    /// Check if this range contains a position.
    #[must_use]
    pub fn contains(&self, pos: usize) -> bool {
        self.range.contains(&pos)
    }

    /// Get the length in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.start >= self.range.end
    }

    /// Move this range across a replacement of `edited` by `inserted`
    /// chars. Returns `false` when nothing of the range survives.
    ///
    /// Positions before the edit stay put and positions after it shift by
    /// the length change. A start inside the removed span moves past the
    /// inserted text; an end inside it collapses onto the edit point. So
    /// inserted chars join the range only when the edit point falls
    /// strictly inside it.
    pub(crate) fn remap(&mut self, edited: &Range<usize>, inserted: usize) -> bool {
        let at = edited.start;
        let shift = |pos: usize| pos - edited.len() + inserted;

        let start = if self.range.start < at {
            self.range.start
        } else if self.range.start <= edited.end {
            at + inserted
        } else {
            shift(self.range.start)
        };
        let end = if self.range.end <= at {
            self.range.end
        } else if self.range.end <= edited.end {
            at
        } else {
            shift(self.range.end)
        };

        self.range = start..end.max(start);
        !self.is_empty()
    }
}
