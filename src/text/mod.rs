//! Attributed text storage and editing.
//!
//! This module provides a rope-backed text store that carries outline
//! attribute ranges, caches attachments and reports every edit to a
//! listener.
//!
//! Key types:
//!
//! - [`TextStore`]: Text, attribute ranges, attachment cache, listener
//! - [`AttributedRange`]: A key/value pair over a char range
//! - [`AttributeChange`]: Attribute mutation carried by an edit
//! - [`EditEvent`]: What a listener receives after each committed edit
//! - [`ChangeListener`]: The notification capability
//!
//! # Examples
//!
//! ## Editing and Attributes
//!
//! ```
//! use outline_storage::{AttributeChange, AttributeKey, AttributeValue, EditAction, TextStore};
//!
//! let mut store = TextStore::with_text("abcdef");
//! let event = store.apply_edit("XY", 2..4, &[]).unwrap().unwrap();
//! assert_eq!(store.text(), "abXYef");
//! assert_eq!(event.range, 2..4);
//! assert_eq!(event.delta, 0);
//! assert_eq!(event.action, EditAction::Replace);
//!
//! // Insert a heading and mark it up in one atomic edit.
//! let changes = [AttributeChange::set(AttributeKey::HeadingLevel, AttributeValue::Int(1), 0..6)];
//! store.apply_edit("* Todo", 0..0, &changes).unwrap();
//! assert_eq!(store.attribute_at(AttributeKey::HeadingLevel, 3), Some(&AttributeValue::Int(1)));
//! ```
//!
//! ## Listening for Changes
//!
//! ```
//! use outline_storage::{EditEvent, TextStore};
//! use std::sync::atomic::{AtomicIsize, Ordering};
//! use std::sync::Arc;
//!
//! let growth = Arc::new(AtomicIsize::new(0));
//! let sink = Arc::clone(&growth);
//! let listener = Arc::new(move |event: &EditEvent| {
//!     sink.fetch_add(event.delta, Ordering::SeqCst);
//! });
//!
//! let mut store = TextStore::new();
//! store.register_change_listener(&listener);
//! store.insert(0, "hello").unwrap();
//! store.delete(0..2).unwrap();
//! assert_eq!(growth.load(Ordering::SeqCst), 3);
//! ```

mod attachment;
mod edit;
mod listener;
mod range;
mod rope;
mod store;

pub use attachment::{Attachment, AttachmentCache, AttachmentKind};
pub use edit::{AttributeChange, EditAction, EditEvent, EditedMask};
pub use listener::ChangeListener;
pub use range::AttributedRange;
pub use rope::RopeWrapper;
pub use store::TextStore;
