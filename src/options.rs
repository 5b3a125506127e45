//! Store configuration.

use crate::attribute::VocabularyVersion;

/// Options controlling a [`TextStore`](crate::TextStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    /// Deliver events for attribute-only edits to the listener.
    pub notify_attribute_changes: bool,
    /// Merge equal-valued neighbouring ranges of a key when setting it.
    pub coalesce_attributes: bool,
    /// Newest vocabulary revision whose keys the store accepts.
    pub vocabulary: VocabularyVersion,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            notify_attribute_changes: true,
            coalesce_attributes: true,
            vocabulary: VocabularyVersion::CURRENT,
        }
    }
}

impl StoreOptions {
    /// Restrict the store to an older vocabulary revision (builder pattern).
    #[must_use]
    pub fn with_vocabulary(mut self, version: VocabularyVersion) -> Self {
        self.vocabulary = version;
        self
    }

    /// Only deliver character edits to the listener (builder pattern).
    #[must_use]
    pub fn characters_only(mut self) -> Self {
        self.notify_attribute_changes = false;
        self
    }

    /// Keep every set range separate (builder pattern).
    #[must_use]
    pub fn without_coalescing(mut self) -> Self {
        self.coalesce_attributes = false;
        self
    }
}
