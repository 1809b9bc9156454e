//! Server-driven content negotiation.
//!
//! [`select_best`] picks the single best [`Variant`] for a client, or `None`
//! when nothing is acceptable. The decision is deterministic: scoring is a
//! pure function of the ordered variant list and the preference set, and
//! every tie-break ultimately falls back to declaration order.
//!
//! # Scoring
//!
//! Each variant is scored per axis in strict priority order: media type,
//! then language, then character set, then content encoding. On one axis,
//! the *most specific* preference matching the variant's value governs
//! (exact beats `type/*` beats `*/*`); the axis score is that preference's
//! quality, tie-broken by how exactly the preference matched. A governing
//! preference with quality 0.0 disqualifies the variant outright — the
//! client declared the value explicitly unacceptable. A variant whose value
//! matches no preference on an axis the client expressed is disqualified;
//! a variant that simply lacks a value on such an axis is kept but ranked
//! below any match. An axis with no client preferences at all is neutral.

use reststack_model::metadata::Metadata;
use reststack_model::{ClientPreferences, Language, Preference, Variant};

/// The score of one variant on one negotiation axis.
#[derive(Debug, Clone, Copy, PartialEq)]
enum AxisScore {
    /// The client explicitly or implicitly rejected this value.
    Disqualified,
    /// Acceptable, with the governing preference's quality and a match rank
    /// (3 exact, 2 partial, 1 wildcard, 0 value absent / axis neutral).
    Acceptable { quality: f32, rank: u8 },
}

impl AxisScore {
    const NEUTRAL: Self = Self::Acceptable {
        quality: 1.0,
        rank: 0,
    };

    const ABSENT: Self = Self::Acceptable {
        quality: 0.0,
        rank: 0,
    };

    fn compare(self, other: Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (Self::Disqualified, Self::Disqualified) => Ordering::Equal,
            (Self::Disqualified, Self::Acceptable { .. }) => Ordering::Less,
            (Self::Acceptable { .. }, Self::Disqualified) => Ordering::Greater,
            (
                Self::Acceptable { quality: q1, rank: r1 },
                Self::Acceptable { quality: q2, rank: r2 },
            ) => q1
                .partial_cmp(&q2)
                .unwrap_or(Ordering::Equal)
                .then(r1.cmp(&r2)),
        }
    }
}

/// Score one metadata value against one preference list.
///
/// The most specific matching preference governs; among equally specific
/// matches the first declared wins.
fn score_axis<T: Metadata>(value: Option<&T>, preferences: &[Preference<T>]) -> AxisScore {
    if preferences.is_empty() {
        return AxisScore::NEUTRAL;
    }

    let Some(value) = value else {
        // The client expressed preferences but the variant declares nothing
        // on this axis: acceptable, ranked below any actual match.
        return AxisScore::ABSENT;
    };

    let mut governing: Option<&Preference<T>> = None;
    for preference in preferences {
        if !preference.metadata.includes(value) {
            continue;
        }
        match governing {
            None => governing = Some(preference),
            Some(current) => {
                if preference.metadata.specificity() > current.metadata.specificity() {
                    governing = Some(preference);
                }
            }
        }
    }

    match governing {
        None => AxisScore::Disqualified,
        Some(preference) => {
            if !preference.is_acceptable() {
                return AxisScore::Disqualified;
            }
            let rank = if preference.metadata.is_wildcard() {
                1
            } else if preference.metadata == *value {
                3
            } else {
                2
            };
            AxisScore::Acceptable {
                quality: preference.quality,
                rank,
            }
        }
    }
}

/// The combined score of one variant, compared lexicographically in the
/// axis priority order.
#[derive(Debug, Clone, Copy)]
struct VariantScore {
    media_type: AxisScore,
    language: AxisScore,
    character_set: AxisScore,
    encoding: AxisScore,
}

impl VariantScore {
    fn of(variant: &Variant, preferences: &ClientPreferences) -> Self {
        Self {
            media_type: score_axis(Some(variant.media_type()), &preferences.media_types),
            language: score_axis(variant.language(), &preferences.languages),
            character_set: score_axis(variant.character_set(), &preferences.character_sets),
            encoding: score_axis(variant.encoding(), &preferences.encodings),
        }
    }

    fn is_acceptable(&self) -> bool {
        self.media_type != AxisScore::Disqualified
            && self.language != AxisScore::Disqualified
            && self.character_set != AxisScore::Disqualified
            && self.encoding != AxisScore::Disqualified
    }

    fn compare(&self, other: &Self) -> std::cmp::Ordering {
        self.media_type
            .compare(other.media_type)
            .then(self.language.compare(other.language))
            .then(self.character_set.compare(other.character_set))
            .then(self.encoding.compare(other.encoding))
    }
}

/// Select the best variant for the client, or `None` when no declared
/// variant is acceptable.
///
/// The variant list order is semantically significant: among fully tied
/// variants, one matching `default_language` wins first, then the
/// first-declared variant. An empty preference set accepts everything, so
/// the first declared variant is returned. An empty variant list yields
/// `None` (the caller resolves that to a not-found outcome, as opposed to
/// not-acceptable for a non-empty list with no acceptable entry).
#[must_use]
pub fn select_best<'a>(
    variants: &'a [Variant],
    preferences: &ClientPreferences,
    default_language: Option<&Language>,
) -> Option<&'a Variant> {
    if variants.is_empty() {
        return None;
    }

    let mut best: Option<(&'a Variant, VariantScore)> = None;
    let mut best_is_default_language = false;

    for variant in variants {
        let score = VariantScore::of(variant, preferences);
        if !score.is_acceptable() {
            tracing::trace!(media_type = %variant.media_type(), "variant disqualified");
            continue;
        }

        match &best {
            None => {
                best_is_default_language = matches_default_language(variant, default_language);
                best = Some((variant, score));
            }
            Some((_, best_score)) => {
                let ordering = score.compare(best_score);
                if ordering == std::cmp::Ordering::Greater {
                    best_is_default_language =
                        matches_default_language(variant, default_language);
                    best = Some((variant, score));
                } else if ordering == std::cmp::Ordering::Equal
                    && !best_is_default_language
                    && matches_default_language(variant, default_language)
                {
                    // Tied on every axis: the configured default language
                    // breaks the tie; otherwise the first declared variant
                    // is kept.
                    best_is_default_language = true;
                    best = Some((variant, score));
                }
            }
        }
    }

    best.map(|(variant, _)| variant)
}

fn matches_default_language(variant: &Variant, default_language: Option<&Language>) -> bool {
    match (variant.language(), default_language) {
        (Some(language), Some(default)) => language == default,
        _ => false,
    }
}
