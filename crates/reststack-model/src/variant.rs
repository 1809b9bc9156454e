//! Representational variants and materialized representations.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::media_type::MediaType;
use crate::metadata::{CharacterSet, ContentEncoding, Language};
use crate::tag::Tag;

/// One representational form a resource can take.
///
/// The media type is required; language, character set, encoding, size, and
/// an identifying reference are optional. Variants are immutable once
/// declared, and the order in which a resource declares them is
/// semantically significant: on negotiation ties, the first-declared
/// variant wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    media_type: MediaType,
    language: Option<Language>,
    character_set: Option<CharacterSet>,
    encoding: Option<ContentEncoding>,
    size: Option<u64>,
    identifier: Option<String>,
}

impl Variant {
    /// Create a variant of the given media type.
    #[must_use]
    pub fn new(media_type: MediaType) -> Self {
        Self {
            media_type,
            language: None,
            character_set: None,
            encoding: None,
            size: None,
            identifier: None,
        }
    }

    /// Set the natural language.
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Set the character set.
    #[must_use]
    pub fn with_character_set(mut self, character_set: CharacterSet) -> Self {
        self.character_set = Some(character_set);
        self
    }

    /// Set the content encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: ContentEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Set the known size in bytes.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set an identifying reference (e.g. a content-location path).
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// The media type.
    #[must_use]
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// The natural language, if declared.
    #[must_use]
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// The character set, if declared.
    #[must_use]
    pub fn character_set(&self) -> Option<&CharacterSet> {
        self.character_set.as_ref()
    }

    /// The content encoding, if declared.
    #[must_use]
    pub fn encoding(&self) -> Option<&ContentEncoding> {
        self.encoding.as_ref()
    }

    /// The known size in bytes, if declared.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// The identifying reference, if declared.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

/// Lightweight representation metadata used by precondition checks.
///
/// Cheap to produce: a resource exposes its current tag and modification
/// date without materializing the representation body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepresentationInfo {
    /// The entity tag of the current representation.
    pub tag: Option<Tag>,
    /// The last modification date of the current representation.
    pub modification_date: Option<DateTime<Utc>>,
}

impl RepresentationInfo {
    /// Create representation info from a tag and a modification date.
    #[must_use]
    pub fn new(tag: Option<Tag>, modification_date: Option<DateTime<Utc>>) -> Self {
        Self {
            tag,
            modification_date,
        }
    }
}

/// A materialized representation: a variant plus its entity bytes.
#[derive(Debug, Clone)]
pub struct Representation {
    variant: Variant,
    data: Bytes,
    info: RepresentationInfo,
}

impl Representation {
    /// Create a representation from a variant and raw bytes.
    #[must_use]
    pub fn new(variant: Variant, data: impl Into<Bytes>) -> Self {
        Self {
            variant,
            data: data.into(),
            info: RepresentationInfo::default(),
        }
    }

    /// Create a plain-text representation.
    #[must_use]
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self::new(
            Variant::new(MediaType::TEXT_PLAIN).with_character_set(CharacterSet::UTF_8),
            text.into(),
        )
    }

    /// Attach the entity tag.
    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.info.tag = Some(tag);
        self
    }

    /// Attach the modification date.
    #[must_use]
    pub fn with_modification_date(mut self, date: DateTime<Utc>) -> Self {
        self.info.modification_date = Some(date);
        self
    }

    /// The variant describing this representation.
    #[must_use]
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// The entity bytes.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// The validator metadata travelling with this representation.
    #[must_use]
    pub fn info(&self) -> &RepresentationInfo {
        &self.info
    }

    /// The entity size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the entity is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
