//! Attribute value types and per-key validation.

use super::key::AttributeKey;
use crate::error::{Error, Result};
use std::fmt;

/// The kind of value an attribute key carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Presence marker (e.g. `separator`, `heading-folded`).
    Flag,
    /// Level or index (e.g. `heading-level`, `ordered-list-index`).
    Integer,
    /// Title, url, type name or schedule token.
    Text,
    /// Key into the store's attachment cache.
    Attachment,
    /// Integer restricted to the [`HiddenValue`] domain.
    Hidden,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flag => "flag",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Attachment => "attachment",
            Self::Hidden => "hidden",
        })
    }
}

/// Why a span of text is hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HiddenValue {
    /// Markup hidden outright.
    #[default]
    Default,
    /// Hidden and replaced by an attachment.
    WithAttachment,
    /// Hidden because its heading is folded.
    Folded,
}

impl HiddenValue {
    /// Stored integer encoding.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::Default => 0,
            Self::WithAttachment => 1,
            Self::Folded => 2,
        }
    }

    /// Decode the stored integer encoding.
    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Default),
            1 => Some(Self::WithAttachment),
            2 => Some(Self::Folded),
            _ => None,
        }
    }
}

/// Runtime representation of an attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "kebab-case"))]
pub enum AttributeValue {
    Flag(bool),
    Int(i64),
    Text(String),
    /// Attachment cache key.
    Attachment(String),
}

impl AttributeValue {
    /// Shorthand for `Flag(true)`.
    #[must_use]
    pub fn present() -> Self {
        Self::Flag(true)
    }

    /// Create a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Create an attachment reference.
    #[must_use]
    pub fn attachment(key: impl Into<String>) -> Self {
        Self::Attachment(key.into())
    }

    /// Create a value for the `hidden` family of keys.
    #[must_use]
    pub fn hidden(value: HiddenValue) -> Self {
        Self::Int(value.as_i64())
    }

    /// Kind of this value. `Int` reports [`ValueKind::Integer`] even when
    /// it holds a [`HiddenValue`].
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Flag(_) => ValueKind::Flag,
            Self::Int(_) => ValueKind::Integer,
            Self::Text(_) => ValueKind::Text,
            Self::Attachment(_) => ValueKind::Attachment,
        }
    }

    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_attachment_key(&self) -> Option<&str> {
        match self {
            Self::Attachment(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_hidden(&self) -> Option<HiddenValue> {
        self.as_int().and_then(HiddenValue::from_i64)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<HiddenValue> for AttributeValue {
    fn from(value: HiddenValue) -> Self {
        Self::hidden(value)
    }
}

impl AttributeKey {
    /// Check that `value` is acceptable for this key.
    ///
    /// Beyond the variant matching [`value_kind`](Self::value_kind),
    /// heading levels must be at least 1, list indices non-negative,
    /// hidden values inside the [`HiddenValue`] domain and attachment
    /// keys non-empty.
    pub fn validate(self, value: &AttributeValue) -> Result<()> {
        let expected = self.value_kind();
        let ok = match (expected, value) {
            (ValueKind::Flag, AttributeValue::Flag(_))
            | (ValueKind::Text, AttributeValue::Text(_)) => true,
            (ValueKind::Integer, AttributeValue::Int(v)) => match self {
                AttributeKey::HeadingLevel => *v >= 1,
                _ => *v >= 0,
            },
            (ValueKind::Hidden, AttributeValue::Int(v)) => HiddenValue::from_i64(*v).is_some(),
            (ValueKind::Attachment, AttributeValue::Attachment(k)) => !k.is_empty(),
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(Error::InvalidAttributeValue {
                key: self,
                expected,
                found: describe(value),
            })
        }
    }
}

fn describe(value: &AttributeValue) -> String {
    let kind = value.kind();
    match value {
        AttributeValue::Flag(v) => format!("{kind} {v}"),
        AttributeValue::Int(v) => format!("{kind} {v}"),
        AttributeValue::Text(v) | AttributeValue::Attachment(v) => format!("{kind} {v:?}"),
    }
}
