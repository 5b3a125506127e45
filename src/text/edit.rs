//! Edit descriptions and change events.

use crate::attribute::{AttributeKey, AttributeValue};
use bitflags::bitflags;
use std::ops::Range;

bitflags! {
    /// What an edit touched, in the layout substrate's terms.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct EditedMask: u8 {
        /// Attribute ranges changed.
        const ATTRIBUTES = 0x01;
        /// Characters were inserted, removed or replaced.
        const CHARACTERS = 0x02;
    }
}

/// Classification of a committed edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EditAction {
    /// Text inserted at an empty range.
    Insert,
    /// Text removed, nothing inserted.
    Delete,
    /// Text removed and new text inserted in its place.
    Replace,
    /// Only attribute ranges changed.
    Attributes,
}

impl EditAction {
    /// Classify a replacement of `removed` chars by `inserted` chars.
    ///
    /// Returns `None` for an edit that changes no characters.
    #[must_use]
    pub fn classify(removed: usize, inserted: usize) -> Option<Self> {
        match (removed, inserted) {
            (0, 0) => None,
            (0, _) => Some(Self::Insert),
            (_, 0) => Some(Self::Delete),
            _ => Some(Self::Replace),
        }
    }

    /// Check whether the action changed characters.
    #[must_use]
    pub fn edits_characters(self) -> bool {
        !matches!(self, Self::Attributes)
    }
}

/// An attribute mutation carried by an edit.
///
/// Ranges are in post-edit coordinates: they address the text as it reads
/// once the character replacement has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeChange {
    /// Set `key` to `value` over `range`, overwriting that key there.
    Set {
        key: AttributeKey,
        value: AttributeValue,
        range: Range<usize>,
    },
    /// Remove `key` from `range`.
    Remove { key: AttributeKey, range: Range<usize> },
    /// Remove every attribute from `range`.
    Clear { range: Range<usize> },
}

impl AttributeChange {
    /// Shorthand for [`AttributeChange::Set`].
    #[must_use]
    pub fn set(key: AttributeKey, value: impl Into<AttributeValue>, range: Range<usize>) -> Self {
        Self::Set {
            key,
            value: value.into(),
            range,
        }
    }

    /// Shorthand for [`AttributeChange::Remove`].
    #[must_use]
    pub fn remove(key: AttributeKey, range: Range<usize>) -> Self {
        Self::Remove { key, range }
    }

    /// Shorthand for [`AttributeChange::Clear`].
    #[must_use]
    pub fn clear(range: Range<usize>) -> Self {
        Self::Clear { range }
    }

    /// Target range of the change.
    #[must_use]
    pub fn range(&self) -> &Range<usize> {
        match self {
            Self::Set { range, .. } | Self::Remove { range, .. } | Self::Clear { range } => range,
        }
    }
}

/// Notification emitted once per committed edit.
///
/// `range` is the edited range as it was *before* the edit, so a listener
/// can translate its own offsets forward: positions at or past
/// `range.end` move by `delta`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditEvent {
    /// Text now occupying the edited range.
    pub text: String,
    /// Text that the edit removed.
    pub removed: String,
    /// Edited char range before the edit.
    pub range: Range<usize>,
    /// Signed change in char count.
    pub delta: isize,
    pub action: EditAction,
    pub edited: EditedMask,
    /// Store revision after the edit.
    pub revision: u64,
}

impl EditEvent {
    /// Range the new text occupies after the edit.
    #[must_use]
    pub fn post_edit_range(&self) -> Range<usize> {
        self.range.start..self.range.start + self.text.chars().count()
    }
}
