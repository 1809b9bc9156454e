//! Client preferences parsed from ranked Accept-style header lists.

use crate::media_type::MediaType;
use crate::metadata::{CharacterSet, ContentEncoding, Language};

/// One entry of a ranked preference list: a metadata pattern and a quality.
///
/// Quality is a float in `[0.0, 1.0]` and defaults to 1.0. A quality of
/// exactly 0.0 means "explicitly not acceptable" and disqualifies matching
/// variants during negotiation.
#[derive(Debug, Clone, PartialEq)]
pub struct Preference<T> {
    /// The preferred metadata value or pattern.
    pub metadata: T,
    /// The associated quality in `[0.0, 1.0]`.
    pub quality: f32,
}

impl<T> Preference<T> {
    /// Create a preference with the default quality of 1.0.
    #[must_use]
    pub fn new(metadata: T) -> Self {
        Self {
            metadata,
            quality: 1.0,
        }
    }

    /// Create a preference with an explicit quality, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn with_quality(metadata: T, quality: f32) -> Self {
        Self {
            metadata,
            quality: quality.clamp(0.0, 1.0),
        }
    }

    /// Whether this preference admits the value at all.
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.quality > 0.0
    }
}

/// Order a preference list descending by quality, preserving declaration
/// order among equal qualities (stable sort).
#[must_use]
pub fn rank<T: Clone>(preferences: &[Preference<T>]) -> Vec<Preference<T>> {
    let mut ranked = preferences.to_vec();
    ranked.sort_by(|a, b| {
        b.quality
            .partial_cmp(&a.quality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// The full set of ranked preferences submitted by one client.
///
/// Each list preserves declaration order. Empty lists mean the client
/// expressed no preference on that axis and accepts everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPreferences {
    /// Accepted media types, in declaration order.
    pub media_types: Vec<Preference<MediaType>>,
    /// Accepted languages, in declaration order.
    pub languages: Vec<Preference<Language>>,
    /// Accepted character sets, in declaration order.
    pub character_sets: Vec<Preference<CharacterSet>>,
    /// Accepted content encodings, in declaration order.
    pub encodings: Vec<Preference<ContentEncoding>>,
}

impl ClientPreferences {
    /// Create an empty preference set (accepts everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the client expressed no preference on any axis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.media_types.is_empty()
            && self.languages.is_empty()
            && self.character_sets.is_empty()
            && self.encodings.is_empty()
    }
}
