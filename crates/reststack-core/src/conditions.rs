//! Precondition evaluation against current representation metadata.

use chrono::{DateTime, SubsecRound, Utc};
use http::Method;
use reststack_model::{Conditions, RepresentationInfo, Status};

/// Whether the method is safe (GET/HEAD) for conditional-request purposes.
fn is_safe(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Compare dates at one-second precision: HTTP dates carry no sub-second
/// component, so finer differences must not influence the outcome.
fn after(earlier: DateTime<Utc>, later: DateTime<Utc>) -> bool {
    later.trunc_subsecs(0) > earlier.trunc_subsecs(0)
}

/// Evaluate the request preconditions against the resource's current state.
///
/// Returns `None` when every precondition holds and handling should
/// proceed, or the terminal [`Status`] to respond with. `exists` reports
/// whether the resource currently has any representation at all; `info`
/// carries the current tag and modification date when it does.
///
/// The rules are applied in order: `If-Match`, `If-None-Match`,
/// `If-Modified-Since`, `If-Unmodified-Since`. Tag comparison follows
/// RFC 7232: strong for `If-Match`, weak for `If-None-Match` on safe
/// methods. An `If-Modified-Since` date in the future is ignored.
#[must_use]
pub fn evaluate(
    method: &Method,
    exists: bool,
    info: Option<&RepresentationInfo>,
    conditions: &Conditions,
) -> Option<Status> {
    let current_tag = info.and_then(|i| i.tag.as_ref());
    let modification_date = info.and_then(|i| i.modification_date);

    // If-Match: at least one listed tag must match the current one.
    if !conditions.match_tags.is_empty() {
        let all = conditions.matches_any();
        let matched = if exists {
            if all {
                true
            } else {
                current_tag.is_some_and(|tag| {
                    conditions.match_tags.iter().any(|m| m.strong_eq(tag))
                })
            }
        } else {
            // A nonexistent resource cannot match any tag, `*` included.
            false
        };

        if !matched {
            tracing::debug!(exists, all, "If-Match precondition failed");
            return Some(Status::PreconditionFailed);
        }
    }

    // If-None-Match: no listed tag may match the current one.
    if !conditions.none_match_tags.is_empty() {
        let matched = if exists {
            match current_tag {
                Some(tag) => {
                    let weak_allowed = is_safe(method);
                    let tag_matched = conditions.none_match_tags.iter().any(|m| {
                        m.is_all()
                            || (weak_allowed && m.weak_eq(tag))
                            || (!weak_allowed && m.strong_eq(tag))
                    });

                    // A matched tag is overridden when the representation
                    // was modified after the If-Modified-Since date.
                    if tag_matched {
                        !modified_since(conditions.modified_since, modification_date)
                    } else {
                        false
                    }
                }
                None => conditions.none_matches_any(),
            }
        } else {
            false
        };

        if matched {
            let status = if is_safe(method) {
                Status::NotModified
            } else {
                Status::PreconditionFailed
            };
            tracing::debug!(%status, "If-None-Match precondition triggered");
            return Some(status);
        }
    }

    // If-Modified-Since: only proceed when the representation changed.
    if let Some(since) = conditions.modified_since {
        if !modified_since(Some(since), modification_date) {
            let status = if is_safe(method) {
                Status::NotModified
            } else {
                Status::PreconditionFailed
            };
            tracing::debug!(%status, "If-Modified-Since precondition triggered");
            return Some(status);
        }
    }

    // If-Unmodified-Since: fail when the representation changed afterwards.
    if let Some(since) = conditions.unmodified_since {
        if let Some(modified) = modification_date {
            if after(since, modified) {
                tracing::debug!("If-Unmodified-Since precondition failed");
                return Some(Status::PreconditionFailed);
            }
        }
    }

    None
}

/// Whether the representation counts as modified after `since`.
///
/// Unknown modification dates and future `since` dates count as modified,
/// so the condition never suppresses a response it cannot verify.
fn modified_since(since: Option<DateTime<Utc>>, modification_date: Option<DateTime<Utc>>) -> bool {
    match since {
        None => true,
        Some(since) => {
            if after(Utc::now(), since) {
                // Date in the future: ignore the condition.
                return true;
            }
            match modification_date {
                None => true,
                Some(modified) => after(since, modified),
            }
        }
    }
}
