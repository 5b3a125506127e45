//! Attachment objects and the per-store attachment cache.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// What an attachment holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AttachmentKind {
    Text,
    Link,
    Image,
    Sketch,
    Audio,
    Video,
    Location,
}

impl AttachmentKind {
    pub const ALL: [Self; 7] = [
        Self::Text,
        Self::Link,
        Self::Image,
        Self::Sketch,
        Self::Audio,
        Self::Video,
        Self::Location,
    ];

    /// Name used as the `attachment-type` attribute value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::Image => "image",
            Self::Sketch => "sketch",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Location => "location",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether the attachment renders as a picture rather than a card.
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Image | Self::Sketch | Self::Video)
    }
}

/// An embedded object referenced from the text by key.
///
/// The store treats attachments as opaque; it only hands them back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    /// Key of the attachment in the owning document's attachment manager.
    pub value: String,
    pub description: Option<String>,
}

impl Attachment {
    #[must_use]
    pub fn new(kind: AttachmentKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Attachments keyed by string.
///
/// Entries are never evicted. Adding under an existing key overwrites it.
#[derive(Clone, Debug, Default)]
pub struct AttachmentCache {
    entries: HashMap<String, Arc<Attachment>>,
}

impl AttachmentCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `key`.
    ///
    /// Returns the entry that was replaced, if any.
    pub fn insert(
        &mut self,
        key: &str,
        attachment: Arc<Attachment>,
    ) -> Result<Option<Arc<Attachment>>> {
        if key.is_empty() {
            return Err(Error::InvalidKey);
        }
        Ok(self.entries.insert(key.to_string(), attachment))
    }

    /// Look up `key`. A miss never creates a placeholder.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<Attachment>> {
        self.entries.get(key).cloned()
    }

    /// Remove and return the entry for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Arc<Attachment>> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over cached keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
