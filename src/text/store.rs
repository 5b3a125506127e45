//! Attributed text store with change notification.
//!
//! [`TextStore`] owns the character sequence, the attribute ranges laid
//! over it and a cache of attachments. Every mutation goes through
//! [`TextStore::apply_edit`], which validates the whole edit up front,
//! commits it, and then reports it to the registered listener.

use crate::attribute::{AttributeKey, AttributeValue, HiddenValue};
use crate::error::{Error, Result};
use crate::options::StoreOptions;
use crate::text::attachment::{Attachment, AttachmentCache};
use crate::text::edit::{AttributeChange, EditAction, EditEvent, EditedMask};
use crate::text::listener::{ChangeListener, ListenerSlot};
use crate::text::range::AttributedRange;
use crate::text::rope::RopeWrapper;
use std::ops::Range;
use std::sync::Arc;

/// Mutable attributed text with a single change listener.
///
/// `TextStore` is designed for one writer: all mutation takes `&mut self`
/// and no locking happens inside. Wrap it in a `Mutex` to share it across
/// threads.
///
/// Edits are all-or-nothing. A rejected edit leaves text, attributes and
/// revision untouched and notifies nobody.
///
/// # Notification contract
///
/// The listener is called synchronously, once per committed edit, after
/// the store has applied it. The event's `range` is the edited range as it
/// was before the edit; listeners translate their own offsets forward
/// using `delta`.
///
/// # Attribute merge policy
///
/// Ranges of one key never overlap. Setting a key over a range overwrites
/// that key there, splitting any existing range at the boundaries. Unless
/// disabled in [`StoreOptions`], equal-valued neighbours of the same key
/// are merged when a value is set. Character edits never merge ranges.
#[derive(Debug, Default)]
pub struct TextStore {
    rope: RopeWrapper,
    ranges: Vec<AttributedRange>,
    attachments: AttachmentCache,
    listener: ListenerSlot,
    options: StoreOptions,
    revision: u64,
}

impl TextStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial text and no attributes.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            rope: RopeWrapper::from_str(text),
            ..Self::default()
        }
    }

    /// Create an empty store with custom options.
    #[must_use]
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Get the store options.
    #[must_use]
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Get the full text.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Get the number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get the number of lines.
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.is_empty()
    }

    /// Copy out a char range.
    pub fn substring(&self, range: Range<usize>) -> Result<String> {
        self.check_range(&range, self.len_chars())?;
        Ok(self.rope.substring(range))
    }

    /// Char range of the line containing `at`, including its line break.
    pub fn line_range(&self, at: usize) -> Result<Range<usize>> {
        self.check_range(&(at..at), self.len_chars())?;
        Ok(self.rope.line_range(at))
    }

    /// Get the underlying rope.
    #[must_use]
    pub fn rope(&self) -> &RopeWrapper {
        &self.rope
    }

    /// Get the store revision (increments on every committed edit).
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Replace `range` with `text` and apply `changes`, atomically.
    ///
    /// `range` addresses the text before the edit; the ranges inside
    /// `changes` address it after the replacement. Returns the event that
    /// was delivered to the listener, or `None` when the edit changes
    /// nothing: no characters replaced and every attribute change already
    /// holds. A no-op leaves the revision alone and notifies nobody.
    ///
    /// # Errors
    ///
    /// - [`Error::RangeOutOfBounds`] if `range` or a change range falls
    ///   outside the text it addresses.
    /// - [`Error::InvalidAttributeValue`] if a value does not fit its key.
    /// - [`Error::UnsupportedKey`] if a key is newer than the configured
    ///   vocabulary.
    pub fn apply_edit(
        &mut self,
        text: &str,
        range: Range<usize>,
        changes: &[AttributeChange],
    ) -> Result<Option<EditEvent>> {
        let len = self.len_chars();
        self.check_range(&range, len)?;

        let inserted = text.chars().count();
        let removed_len = range.len();
        let new_len = len - removed_len + inserted;
        for change in changes {
            self.validate_change(change, new_len)?;
        }

        let action = match EditAction::classify(removed_len, inserted) {
            Some(action) => action,
            None if changes.is_empty() => return Ok(None),
            None => EditAction::Attributes,
        };

        // Attribute-only changes that already hold leave nothing to commit.
        if !action.edits_characters() && !changes.iter().any(|change| self.takes_effect(change)) {
            return Ok(None);
        }

        // Validation is complete; nothing below can fail.
        let mut edited = EditedMask::empty();
        let mut removed = String::new();
        if action.edits_characters() {
            removed = self.rope.splice(range.clone(), text);
            self.ranges.retain_mut(|attr| attr.remap(&range, inserted));
            // Starts collapsing onto the edit point can break key order.
            self.ranges.sort_by_key(|attr| (attr.range.start, attr.key));
            edited |= EditedMask::CHARACTERS;
        }
        let mut attributes_changed = false;
        for change in changes {
            attributes_changed |= self.apply_change(change);
        }
        if attributes_changed {
            edited |= EditedMask::ATTRIBUTES;
        }
        self.revision = self.revision.wrapping_add(1);

        let event_range = if action.edits_characters() {
            range
        } else {
            covering_range(changes)
        };
        let event = EditEvent {
            text: text.to_string(),
            removed,
            range: event_range,
            delta: inserted as isize - removed_len as isize,
            action,
            edited,
            revision: self.revision,
        };

        tracing::debug!(
            revision = event.revision,
            action = ?event.action,
            start = event.range.start,
            end = event.range.end,
            delta = event.delta,
            attribute_changes = changes.len(),
            "edit committed"
        );

        if action.edits_characters() || self.options.notify_attribute_changes {
            self.listener.notify(&event);
        }
        Ok(Some(event))
    }

    /// Insert `text` at char offset `at`.
    pub fn insert(&mut self, at: usize, text: &str) -> Result<Option<EditEvent>> {
        self.apply_edit(text, at..at, &[])
    }

    /// Delete a char range.
    pub fn delete(&mut self, range: Range<usize>) -> Result<Option<EditEvent>> {
        self.apply_edit("", range, &[])
    }

    /// Replace a char range with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<Option<EditEvent>> {
        self.apply_edit(text, range, &[])
    }

    /// Replace the whole text. Every attribute range is dropped.
    pub fn set_text(&mut self, text: &str) -> Result<Option<EditEvent>> {
        let len = self.len_chars();
        self.apply_edit(text, 0..len, &[])
    }

    /// Set `key` to `value` over `range`.
    pub fn set_attribute(
        &mut self,
        key: AttributeKey,
        value: impl Into<AttributeValue>,
        range: Range<usize>,
    ) -> Result<Option<EditEvent>> {
        self.attributes_only(AttributeChange::set(key, value, range))
    }

    /// Remove `key` from `range`.
    pub fn remove_attribute(
        &mut self,
        key: AttributeKey,
        range: Range<usize>,
    ) -> Result<Option<EditEvent>> {
        self.attributes_only(AttributeChange::remove(key, range))
    }

    /// Remove every attribute from `range`.
    pub fn clear_attributes(&mut self, range: Range<usize>) -> Result<Option<EditEvent>> {
        self.attributes_only(AttributeChange::clear(range))
    }

    fn attributes_only(&mut self, change: AttributeChange) -> Result<Option<EditEvent>> {
        let at = change.range().start.min(self.len_chars());
        self.apply_edit("", at..at, std::slice::from_ref(&change))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// All attribute ranges, ordered by start then key.
    #[must_use]
    pub fn ranges(&self) -> &[AttributedRange] {
        &self.ranges
    }

    /// Ranges carrying `key`.
    pub fn ranges_for(&self, key: AttributeKey) -> impl Iterator<Item = &AttributedRange> {
        self.ranges.iter().filter(move |attr| attr.key == key)
    }

    /// Ranges overlapping a char range.
    pub fn ranges_in(&self, range: Range<usize>) -> impl Iterator<Item = &AttributedRange> {
        self.ranges.iter().filter(move |attr| attr.overlaps(&range))
    }

    /// Ranges covering a char position.
    pub fn attributes_at(&self, at: usize) -> impl Iterator<Item = &AttributedRange> {
        self.ranges.iter().filter(move |attr| attr.contains(at))
    }

    /// Value of `key` at a char position.
    #[must_use]
    pub fn attribute_at(&self, key: AttributeKey, at: usize) -> Option<&AttributeValue> {
        self.range_at(key, at).map(|attr| &attr.value)
    }

    /// Extent of the `key` range covering a char position.
    #[must_use]
    pub fn effective_range(&self, key: AttributeKey, at: usize) -> Option<Range<usize>> {
        self.range_at(key, at).map(|attr| attr.range.clone())
    }

    /// Extent of the folded span covering a char position.
    ///
    /// A span is folded where `temporary-hidden` carries
    /// [`HiddenValue::Folded`]. Adjacent folded ranges are joined, so the
    /// result does not depend on whether they were coalesced.
    #[must_use]
    pub fn folded_range(&self, at: usize) -> Option<Range<usize>> {
        let key = AttributeKey::TemporaryHidden;
        let folded = AttributeValue::hidden(HiddenValue::Folded);
        let hit = self.range_at(key, at).filter(|attr| attr.value == folded)?;

        let joins = |attr: &&AttributedRange| attr.key == key && attr.value == folded;
        let mut span = hit.range.clone();
        while let Some(prev) = self
            .ranges
            .iter()
            .filter(joins)
            .find(|attr| attr.range.end == span.start)
        {
            span.start = prev.range.start;
        }
        while let Some(next) = self
            .ranges
            .iter()
            .filter(joins)
            .find(|attr| attr.range.start == span.end)
        {
            span.end = next.range.end;
        }
        Some(span)
    }

    /// Check whether a char position lies inside a folded span.
    #[must_use]
    pub fn is_folded(&self, at: usize) -> bool {
        self.folded_range(at).is_some()
    }

    fn range_at(&self, key: AttributeKey, at: usize) -> Option<&AttributedRange> {
        self.ranges
            .iter()
            .find(|attr| attr.key == key && attr.contains(at))
    }

    // ------------------------------------------------------------------
    // Attachments
    // ------------------------------------------------------------------

    /// Cache `attachment` under `key`, overwriting any previous entry.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] if `key` is empty.
    pub fn add_attachment(
        &mut self,
        attachment: impl Into<Arc<Attachment>>,
        key: &str,
    ) -> Result<()> {
        let replaced = self.attachments.insert(key, attachment.into())?;
        tracing::trace!(key, replaced = replaced.is_some(), "attachment cached");
        Ok(())
    }

    /// Look up a cached attachment. A miss is `None`, never a placeholder.
    #[must_use]
    pub fn cached_attachment(&self, key: &str) -> Option<Arc<Attachment>> {
        self.attachments.get(key)
    }

    /// Drop a cached attachment.
    pub fn remove_attachment(&mut self, key: &str) -> Option<Arc<Attachment>> {
        self.attachments.remove(key)
    }

    /// Number of cached attachments.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// Get the attachment cache.
    #[must_use]
    pub fn attachments(&self) -> &AttachmentCache {
        &self.attachments
    }

    /// Resolve the `attachment` attribute at a char position through the
    /// cache.
    #[must_use]
    pub fn attachment_at(&self, at: usize) -> Option<Arc<Attachment>> {
        self.attribute_at(AttributeKey::Attachment, at)
            .and_then(AttributeValue::as_attachment_key)
            .and_then(|key| self.attachments.get(key))
    }

    // ------------------------------------------------------------------
    // Listener
    // ------------------------------------------------------------------

    /// Register the change listener, replacing any previous one.
    ///
    /// The store keeps only a weak reference. Once the caller drops its
    /// last `Arc`, notifications are skipped silently.
    pub fn register_change_listener<L: ChangeListener + 'static>(&mut self, listener: &Arc<L>) {
        self.listener.set(listener);
    }

    /// Stop notifying the current listener.
    pub fn unregister_change_listener(&mut self) {
        self.listener.clear();
    }

    /// Check for a registered listener that is still alive.
    #[must_use]
    pub fn has_change_listener(&self) -> bool {
        self.listener.is_live()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn check_range(&self, range: &Range<usize>, len: usize) -> Result<()> {
        if range.start <= range.end && range.end <= len {
            Ok(())
        } else {
            Err(Error::out_of_bounds(range, len))
        }
    }

    fn validate_change(&self, change: &AttributeChange, new_len: usize) -> Result<()> {
        self.check_range(change.range(), new_len)?;
        if let AttributeChange::Set { key, value, .. } = change {
            let version = self.options.vocabulary;
            if !key.is_available_in(version) {
                return Err(Error::UnsupportedKey {
                    key: *key,
                    since: key.since(),
                    version,
                });
            }
            key.validate(value)?;
        }
        Ok(())
    }

    /// Whether applying `change` to the current ranges would alter them.
    fn takes_effect(&self, change: &AttributeChange) -> bool {
        match change {
            AttributeChange::Set { key, value, range } => {
                !range.is_empty()
                    && !self.ranges.iter().any(|attr| {
                        attr.key == *key
                            && attr.value == *value
                            && attr.range.start <= range.start
                            && range.end <= attr.range.end
                    })
            }
            AttributeChange::Remove { key, range } => {
                !range.is_empty()
                    && self
                        .ranges
                        .iter()
                        .any(|attr| attr.key == *key && attr.overlaps(range))
            }
            AttributeChange::Clear { range } => {
                !range.is_empty() && self.ranges.iter().any(|attr| attr.overlaps(range))
            }
        }
    }

    /// Apply one change. Returns `false` if the ranges were left as they were.
    fn apply_change(&mut self, change: &AttributeChange) -> bool {
        if !self.takes_effect(change) {
            return false;
        }
        match change {
            AttributeChange::Set { key, value, range } => {
                self.erase(Some(*key), range);
                self.write(AttributedRange::new(*key, value.clone(), range.clone()));
            }
            AttributeChange::Remove { key, range } => self.erase(Some(*key), range),
            AttributeChange::Clear { range } => self.erase(None, range),
        }
        true
    }

    /// Cut `range` out of every range of `key` (or of every key).
    ///
    /// Left pieces keep their start and stay in place; right pieces start
    /// at `range.end` and are re-inserted in order.
    fn erase(&mut self, key: Option<AttributeKey>, range: &Range<usize>) {
        if range.is_empty() {
            return;
        }
        let mut tails = Vec::new();
        self.ranges.retain_mut(|attr| {
            if key.is_some_and(|k| k != attr.key) || !attr.overlaps(range) {
                return true;
            }
            if attr.range.end > range.end {
                tails.push(AttributedRange::new(
                    attr.key,
                    attr.value.clone(),
                    range.end..attr.range.end,
                ));
            }
            attr.range.end = range.start;
            !attr.is_empty()
        });
        for tail in tails {
            self.insert_sorted(tail);
        }
    }

    fn insert_sorted(&mut self, attr: AttributedRange) {
        let idx = self
            .ranges
            .partition_point(|other| (other.range.start, other.key) < (attr.range.start, attr.key));
        self.ranges.insert(idx, attr);
    }

    /// Insert a range whose span is already free of its key.
    fn write(&mut self, mut attr: AttributedRange) {
        if self.options.coalesce_attributes {
            self.ranges.retain(|other| {
                if other.key != attr.key || other.value != attr.value {
                    return true;
                }
                if other.range.end == attr.range.start {
                    attr.range.start = other.range.start;
                    false
                } else if other.range.start == attr.range.end {
                    attr.range.end = other.range.end;
                    false
                } else {
                    true
                }
            });
        }
        self.insert_sorted(attr);
    }
}

/// Smallest range covering every change.
fn covering_range(changes: &[AttributeChange]) -> Range<usize> {
    let start = changes.iter().map(|c| c.range().start).min().unwrap_or(0);
    let end = changes.iter().map(|c| c.range().end).max().unwrap_or(start);
    start..end
}
