//! The outline attribute vocabulary.

use super::value::ValueKind;
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Revision of the attribute vocabulary.
///
/// Revisions only ever add keys. A document written against an older
/// revision decodes unchanged under every newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VocabularyVersion {
    /// Heading metadata, checkbox status/box, link title.
    V1,
    /// Priority, planning, links, lists, separators, attachments, hiding.
    V2,
    /// Temporary hiding, attachment visibility, buttons, date and time.
    V3,
}

impl VocabularyVersion {
    /// The newest revision.
    pub const CURRENT: Self = Self::V3;
}

impl Default for VocabularyVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for VocabularyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::V2 => f.write_str("v2"),
            Self::V3 => f.write_str("v3"),
        }
    }
}

macro_rules! vocabulary {
    ($(
        $(#[$doc:meta])*
        $variant:ident => $name:literal, $kind:ident, $since:ident;
    )*) => {
        /// A named outline attribute.
        ///
        /// Each key has a stable wire name, the kind of value it carries and
        /// the vocabulary revision that introduced it.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum AttributeKey {
            $($(#[$doc])* $variant,)*
        }

        impl AttributeKey {
            /// Every key of the current vocabulary, in declaration order.
            pub const ALL: &'static [AttributeKey] = &[$(AttributeKey::$variant,)*];

            /// Canonical wire name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Kind of value this key carries.
            #[must_use]
            pub const fn value_kind(self) -> ValueKind {
                match self {
                    $(Self::$variant => ValueKind::$kind,)*
                }
            }

            /// Vocabulary revision that introduced this key.
            #[must_use]
            pub const fn since(self) -> VocabularyVersion {
                match self {
                    $(Self::$variant => VocabularyVersion::$since,)*
                }
            }

            fn from_canonical(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

vocabulary! {
    /// Heading is folded.
    HeadingFolded => "heading-folded", Flag, V1;
    /// Heading depth, starting at 1.
    HeadingLevel => "heading-level", Integer, V1;
    HeadingSchedule => "heading-schedule", Text, V1;
    HeadingDue => "heading-due", Text, V1;
    HeadingTags => "heading-tags", Text, V1;
    HeadingPriority => "heading-priority", Text, V2;
    /// Planning keyword such as `TODO` or `DONE`.
    HeadingPlanning => "heading-planning", Text, V2;
    Checkbox => "checkbox", Flag, V2;
    /// Checkbox state token (`[ ]`, `[-]`, `[X]`).
    CheckboxStatus => "checkbox-status", Text, V1;
    CheckboxBox => "checkbox-box", Flag, V1;
    LinkTitle => "link-title", Text, V1;
    LinkUrl => "link-url", Text, V2;
    LinkOther => "link-other", Text, V2;
    UnorderedList => "unordered-list", Flag, V2;
    UnorderedListPrefix => "unordered-list-prefix", Text, V2;
    OrderedList => "ordered-list", Flag, V2;
    /// Position within an ordered list, starting at 0.
    OrderedListIndex => "ordered-list-index", Integer, V2;
    Separator => "separator", Flag, V2;
    /// Reference to an entry in the store's attachment cache.
    Attachment => "attachment", Attachment, V2;
    AttachmentType => "attachment-type", Text, V2;
    AttachmentValue => "attachment-value", Text, V2;
    AttachmentUnavailable => "attachment-unavailable", Flag, V2;
    Hidden => "hidden", Hidden, V2;
    TemporaryHidden => "temporary-hidden", Hidden, V3;
    /// Names which attachment to draw in place of the covered text.
    ShowAttachment => "show-attachment", Text, V3;
    TemporaryShowAttachment => "temporary-show-attachment", Text, V3;
    Button => "button", Flag, V3;
    ButtonBorder => "button-border", Flag, V3;
    DateAndTime => "date-and-time", Text, V3;
}

/// Retired names that still decode to a canonical key.
const ALIASES: &[(&str, AttributeKey)] = &[
    ("heading-deadline", AttributeKey::HeadingDue),
    ("link", AttributeKey::LinkUrl),
    ("temparory-show-attachment", AttributeKey::TemporaryShowAttachment),
];

impl AttributeKey {
    /// Decode a wire name, accepting retired aliases.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_canonical(name).or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, key)| *key)
        })
    }

    /// Iterate over every key of the current vocabulary.
    pub fn iter() -> impl Iterator<Item = AttributeKey> {
        Self::ALL.iter().copied()
    }

    /// Iterate over the keys available in `version`.
    pub fn for_version(version: VocabularyVersion) -> impl Iterator<Item = AttributeKey> {
        Self::iter().filter(move |key| key.since() <= version)
    }

    /// Check whether this key exists in `version`.
    #[must_use]
    pub fn is_available_in(self, version: VocabularyVersion) -> bool {
        self.since() <= version
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnknownKey(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AttributeKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AttributeKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::from_name(&name).ok_or_else(|| {
            serde::de::Error::custom(format_args!("unknown attribute key `{name}`"))
        })
    }
}
