//! `outline_storage` - Attributed text storage for outline editors
//!
//! A rope-backed text store carrying a versioned vocabulary of outline
//! attributes (headings, checkboxes, links, lists, attachments, folding),
//! a keyed attachment cache, and synchronous change notification to a
//! single non-owning listener.

// Crate-level lint configuration
#![allow(clippy::cast_possible_wrap)] // Char counts fit in isize
#![allow(clippy::module_name_repetitions)] // Allow text::TextStore etc
#![allow(clippy::missing_errors_doc)] // Errors documented on apply_edit
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::should_implement_trait)] // from_str naming is intentional
#![allow(clippy::must_use_candidate)] // Not every getter needs must_use

pub mod attribute;
pub mod error;
pub mod options;
pub mod text;

// Re-export core types at crate root
pub use attribute::{AttributeKey, AttributeValue, HiddenValue, ValueKind, VocabularyVersion};
pub use error::{Error, Result};
pub use options::StoreOptions;
pub use text::{
    Attachment, AttachmentCache, AttachmentKind, AttributeChange, AttributedRange,
    ChangeListener, EditAction, EditEvent, EditedMask, TextStore,
};
