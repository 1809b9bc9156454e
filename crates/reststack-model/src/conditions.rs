//! Preconditions attached to one request.

use chrono::{DateTime, Utc};

use crate::tag::Tag;

/// The tag and date preconditions parsed from one request's If-* headers.
///
/// Evaluation against a resource's current [`RepresentationInfo`]
/// (tag + modification date) lives in `reststack-core`; this type is pure
/// data.
///
/// [`RepresentationInfo`]: crate::variant::RepresentationInfo
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    /// Tags from `If-Match`: at least one must match the current tag.
    pub match_tags: Vec<Tag>,
    /// Tags from `If-None-Match`: none may match the current tag.
    pub none_match_tags: Vec<Tag>,
    /// Date from `If-Modified-Since`.
    pub modified_since: Option<DateTime<Utc>>,
    /// Date from `If-Unmodified-Since`.
    pub unmodified_since: Option<DateTime<Utc>>,
}

impl Conditions {
    /// Create an empty condition set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the request carries no preconditions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.match_tags.is_empty()
            && self.none_match_tags.is_empty()
            && self.modified_since.is_none()
            && self.unmodified_since.is_none()
    }

    /// Whether `If-Match` consists of the single match-anything tag.
    #[must_use]
    pub fn matches_any(&self) -> bool {
        self.match_tags.first().is_some_and(Tag::is_all)
    }

    /// Whether `If-None-Match` consists of the single match-anything tag.
    #[must_use]
    pub fn none_matches_any(&self) -> bool {
        self.none_match_tags.first().is_some_and(Tag::is_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_report_empty_conditions() {
        assert!(Conditions::new().is_empty());
    }

    #[test]
    fn test_should_detect_wildcard_match() {
        let conditions = Conditions {
            match_tags: vec![Tag::all()],
            ..Conditions::default()
        };
        assert!(conditions.matches_any());
        assert!(!conditions.none_matches_any());
        assert!(!conditions.is_empty());
    }
}
