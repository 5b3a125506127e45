//! Outline attribute vocabulary.
//!
//! A fixed, versioned set of named keys that mark up spans of outline text
//! (headings, checkboxes, links, lists, attachments, folding state), and
//! the typed values those keys carry.
//!
//! # Examples
//!
//! ```
//! use outline_storage::attribute::{AttributeKey, AttributeValue, ValueKind, VocabularyVersion};
//!
//! let key: AttributeKey = "heading-level".parse().unwrap();
//! assert_eq!(key.value_kind(), ValueKind::Integer);
//! assert!(key.validate(&AttributeValue::Int(2)).is_ok());
//!
//! // Retired names still decode.
//! assert_eq!(AttributeKey::from_name("heading-deadline"), Some(AttributeKey::HeadingDue));
//!
//! let v1 = AttributeKey::for_version(VocabularyVersion::V1).count();
//! assert!(v1 < AttributeKey::ALL.len());
//! ```

mod key;
mod value;

pub use key::{AttributeKey, VocabularyVersion};
pub use value::{AttributeValue, HiddenValue, ValueKind};
