//! Codecs between wire headers and model types.
//!
//! This module parses the client-submitted negotiation and precondition
//! headers into their `reststack-model` counterparts, and formats validator
//! headers on the way out:
//!
//! - `Accept`, `Accept-Language`, `Accept-Charset`, `Accept-Encoding`
//!   become ranked [`Preference`] lists (declaration order preserved).
//! - `If-Match`, `If-None-Match`, `If-Modified-Since`, `If-Unmodified-Since`
//!   become a [`Conditions`] set.
//!
//! Quality parsing fails closed: a malformed or out-of-range `q` value is
//! kept with quality 0.0 — the entry then never makes anything acceptable —
//! rather than rejecting the request.

use chrono::{DateTime, Utc};
use http::HeaderMap;
use reststack_model::preference;
use reststack_model::{
    CharacterSet, ClientPreferences, Conditions, ContentEncoding, Language, MediaType,
    Preference, Tag,
};

/// Parse an HTTP date string into a `DateTime<Utc>`.
///
/// Tries the date formats commonly seen in HTTP:
/// - RFC 2822 / IMF-fixdate (e.g., `Mon, 15 Jan 2024 10:30:00 GMT`)
/// - ISO 8601 / RFC 3339 (e.g., `2024-01-15T10:30:00Z`)
/// - asctime (e.g., `Mon Jan 15 10:30:00 2024`)
#[must_use]
pub fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %H:%M:%S GMT") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%a %b %e %H:%M:%S %Y") {
        return Some(dt.and_utc());
    }
    None
}

/// Format a date in IMF-fixdate form for response headers.
#[must_use]
pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse one `q` parameter value, failing closed to 0.0.
fn parse_quality(raw: &str) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(q) if (0.0..=1.0).contains(&q) => q,
        _ => 0.0,
    }
}

/// Split one Accept-style entry into its value part and an optional
/// quality. Parameters before `q` stay with the value; parameters after
/// `q` (accept extensions) are dropped.
fn split_entry(entry: &str) -> (String, f32) {
    let mut value = String::new();
    let mut quality = 1.0;
    let mut seen_q = false;

    for (index, section) in entry.split(';').enumerate() {
        let section = section.trim();
        if index == 0 {
            value.push_str(section);
            continue;
        }
        if seen_q {
            continue;
        }
        match section.split_once('=') {
            Some((name, raw)) if name.trim().eq_ignore_ascii_case("q") => {
                quality = parse_quality(raw);
                seen_q = true;
            }
            _ => {
                value.push(';');
                value.push_str(section);
            }
        }
    }

    (value, quality)
}

/// Parse an `Accept` header value into ranked media-type preferences.
///
/// Entries that do not parse as media types are skipped; entries with a
/// malformed quality are kept at quality 0.0.
#[must_use]
pub fn parse_accept(value: &str) -> Vec<Preference<MediaType>> {
    value
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let (value, quality) = split_entry(entry);
            match value.parse::<MediaType>() {
                Ok(media_type) => Some(Preference::with_quality(media_type, quality)),
                Err(_) => {
                    tracing::debug!(entry = %value, "skipping unparseable Accept entry");
                    None
                }
            }
        })
        .collect()
}

/// Parse an `Accept-Language` header value.
#[must_use]
pub fn parse_accept_language(value: &str) -> Vec<Preference<Language>> {
    parse_simple_list(value, |s| Language::new(s))
}

/// Parse an `Accept-Charset` header value.
#[must_use]
pub fn parse_accept_charset(value: &str) -> Vec<Preference<CharacterSet>> {
    parse_simple_list(value, |s| CharacterSet::new(s))
}

/// Parse an `Accept-Encoding` header value.
#[must_use]
pub fn parse_accept_encoding(value: &str) -> Vec<Preference<ContentEncoding>> {
    parse_simple_list(value, |s| ContentEncoding::new(s))
}

fn parse_simple_list<T>(value: &str, build: impl Fn(&str) -> T) -> Vec<Preference<T>> {
    value
        .split(',')
        .filter_map(|entry| {
            let (value, quality) = split_entry(entry);
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            Some(Preference::with_quality(build(value), quality))
        })
        .collect()
}

/// Parse an `If-Match`/`If-None-Match` header value into a tag list.
///
/// Malformed tags are skipped.
#[must_use]
pub fn parse_tag_list(value: &str) -> Vec<Tag> {
    value
        .split(',')
        .filter_map(|entry| Tag::parse_http(entry.trim()))
        .collect()
}

/// Collect the full preference set from request headers.
///
/// Each list is ranked descending by quality, with declaration order
/// preserved among equal qualities (see [`preference::rank`]).
#[must_use]
pub fn preferences_from_headers(headers: &HeaderMap) -> ClientPreferences {
    let header_value = |name: http::header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_owned()
    };

    ClientPreferences {
        media_types: preference::rank(&parse_accept(&header_value(http::header::ACCEPT))),
        languages: preference::rank(&parse_accept_language(&header_value(
            http::header::ACCEPT_LANGUAGE,
        ))),
        character_sets: preference::rank(&parse_accept_charset(&header_value(
            http::header::ACCEPT_CHARSET,
        ))),
        encodings: preference::rank(&parse_accept_encoding(&header_value(
            http::header::ACCEPT_ENCODING,
        ))),
    }
}

/// Collect the precondition set from request headers.
#[must_use]
pub fn conditions_from_headers(headers: &HeaderMap) -> Conditions {
    let string_value = |name: http::header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    Conditions {
        match_tags: string_value(http::header::IF_MATCH)
            .map(|v| parse_tag_list(&v))
            .unwrap_or_default(),
        none_match_tags: string_value(http::header::IF_NONE_MATCH)
            .map(|v| parse_tag_list(&v))
            .unwrap_or_default(),
        modified_since: string_value(http::header::IF_MODIFIED_SINCE)
            .and_then(|v| parse_http_date(&v)),
        unmodified_since: string_value(http::header::IF_UNMODIFIED_SINCE)
            .and_then(|v| parse_http_date(&v)),
    }
}
