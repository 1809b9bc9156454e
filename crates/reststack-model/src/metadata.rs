//! Negotiable metadata: languages, character sets, and content encodings.
//!
//! Each metadata kind supports wildcard-aware compatibility via
//! [`Metadata::includes`]: a preference pattern (possibly a wildcard)
//! includes a concrete value declared by a variant. [`Metadata::specificity`]
//! ranks patterns so that exact matches outrank wildcard matches when
//! qualities tie.

use std::borrow::Cow;
use std::fmt;

/// Common behavior of negotiable metadata values.
pub trait Metadata: Clone + PartialEq {
    /// Whether this value, treated as a preference pattern, includes `other`.
    fn includes(&self, other: &Self) -> bool;

    /// How specific this pattern is; higher outranks lower on quality ties.
    fn specificity(&self) -> u8;

    /// Whether this value is the full wildcard.
    fn is_wildcard(&self) -> bool;
}

/// A natural language tag, e.g. `en` or `en-US`.
///
/// Tags are normalized to lowercase. The primary sub-tag governs inclusion:
/// `en` includes `en-US`, but `en-US` includes only itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    tag: Cow<'static, str>,
}

impl Language {
    /// The wildcard language, matching any tag.
    pub const ALL: Self = Self {
        tag: Cow::Borrowed("*"),
    };

    /// English.
    pub const ENGLISH: Self = Self {
        tag: Cow::Borrowed("en"),
    };

    /// French.
    pub const FRENCH: Self = Self {
        tag: Cow::Borrowed("fr"),
    };

    /// Create a language from a tag, normalizing to lowercase.
    #[must_use]
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self {
            tag: Cow::Owned(tag.as_ref().trim().to_ascii_lowercase()),
        }
    }

    /// The full tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The primary sub-tag (the part before the first `-`).
    #[must_use]
    pub fn primary_tag(&self) -> &str {
        self.tag.split('-').next().unwrap_or(&self.tag)
    }

    /// Whether this tag has secondary sub-tags.
    #[must_use]
    pub fn has_sub_tags(&self) -> bool {
        self.tag.contains('-')
    }
}

impl Metadata for Language {
    fn includes(&self, other: &Self) -> bool {
        if self.is_wildcard() {
            return true;
        }
        if self.tag == other.tag {
            return true;
        }
        // A primary-only tag includes all of its sub-tagged variants.
        !self.has_sub_tags() && self.primary_tag() == other.primary_tag()
    }

    fn specificity(&self) -> u8 {
        if self.is_wildcard() {
            0
        } else if self.has_sub_tags() {
            2
        } else {
            1
        }
    }

    fn is_wildcard(&self) -> bool {
        self.tag == "*"
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// A character set name, e.g. `utf-8`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterSet {
    name: Cow<'static, str>,
}

impl CharacterSet {
    /// The wildcard character set.
    pub const ALL: Self = Self {
        name: Cow::Borrowed("*"),
    };

    /// UTF-8.
    pub const UTF_8: Self = Self {
        name: Cow::Borrowed("utf-8"),
    };

    /// ISO Latin 1.
    pub const ISO_8859_1: Self = Self {
        name: Cow::Borrowed("iso-8859-1"),
    };

    /// Create a character set from a name, normalizing to lowercase.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Cow::Owned(name.as_ref().trim().to_ascii_lowercase()),
        }
    }

    /// The character set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Metadata for CharacterSet {
    fn includes(&self, other: &Self) -> bool {
        self.is_wildcard() || self.name == other.name
    }

    fn specificity(&self) -> u8 {
        u8::from(!self.is_wildcard())
    }

    fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A content coding name, e.g. `gzip` or `identity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentEncoding {
    name: Cow<'static, str>,
}

impl ContentEncoding {
    /// The wildcard encoding.
    pub const ALL: Self = Self {
        name: Cow::Borrowed("*"),
    };

    /// The identity (no-op) encoding.
    pub const IDENTITY: Self = Self {
        name: Cow::Borrowed("identity"),
    };

    /// GZip compression.
    pub const GZIP: Self = Self {
        name: Cow::Borrowed("gzip"),
    };

    /// Deflate compression.
    pub const DEFLATE: Self = Self {
        name: Cow::Borrowed("deflate"),
    };

    /// Create an encoding from a name, normalizing to lowercase.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Cow::Owned(name.as_ref().trim().to_ascii_lowercase()),
        }
    }

    /// The coding name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Metadata for ContentEncoding {
    fn includes(&self, other: &Self) -> bool {
        self.is_wildcard() || self.name == other.name
    }

    fn specificity(&self) -> u8 {
        u8::from(!self.is_wildcard())
    }

    fn is_wildcard(&self) -> bool {
        self.name == "*"
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_include_sub_tagged_language() {
        let en = Language::new("en");
        let en_us = Language::new("en-US");
        assert!(en.includes(&en_us));
        assert!(!en_us.includes(&en));
        assert!(en_us.includes(&en_us));
    }

    #[test]
    fn test_should_include_any_language_with_wildcard() {
        assert!(Language::ALL.includes(&Language::new("ja")));
        assert!(Language::ALL.includes(&Language::new("pt-BR")));
    }

    #[test]
    fn test_should_rank_language_specificity() {
        assert!(Language::new("en-US").specificity() > Language::new("en").specificity());
        assert!(Language::new("en").specificity() > Language::ALL.specificity());
    }

    #[test]
    fn test_should_normalize_case() {
        assert_eq!(Language::new("EN-us"), Language::new("en-US"));
        assert_eq!(CharacterSet::new("UTF-8"), CharacterSet::UTF_8);
    }

    #[test]
    fn test_should_match_character_sets_exactly() {
        assert!(CharacterSet::UTF_8.includes(&CharacterSet::new("utf-8")));
        assert!(!CharacterSet::UTF_8.includes(&CharacterSet::ISO_8859_1));
        assert!(CharacterSet::ALL.includes(&CharacterSet::ISO_8859_1));
    }

    #[test]
    fn test_should_match_encodings_exactly() {
        assert!(ContentEncoding::GZIP.includes(&ContentEncoding::new("gzip")));
        assert!(!ContentEncoding::GZIP.includes(&ContentEncoding::DEFLATE));
        assert!(ContentEncoding::ALL.includes(&ContentEncoding::IDENTITY));
    }
}
