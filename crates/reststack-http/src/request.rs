//! HTTP request to [`RestRequest`] assembly.

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use reststack_core::{HostInfo, RestRequest};

use crate::headers::{conditions_from_headers, preferences_from_headers};

/// Decode a percent-encoded URI component.
fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Extract host metadata from the request head.
///
/// The domain and port come from the URI authority when absolute, falling
/// back to the `Host` header; the scheme comes from the URI when present.
fn host_info(parts: &http::request::Parts) -> HostInfo {
    let authority = parts
        .uri
        .authority()
        .map(|a| a.to_string())
        .or_else(|| {
            parts
                .headers
                .get(http::header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned)
        });

    let (domain, port) = match authority {
        None => (None, None),
        Some(authority) => match authority.rsplit_once(':') {
            Some((host, port)) => (Some(host.to_owned()), port.parse::<u16>().ok()),
            None => (Some(authority), None),
        },
    };

    HostInfo {
        domain,
        port,
        scheme: parts.uri.scheme_str().map(ToOwned::to_owned),
    }
}

/// Build a [`RestRequest`] from collected HTTP request parts and body.
///
/// The path is percent-decoded before routing, so captured template
/// variables arrive decoded.
#[must_use]
pub fn from_http_parts(parts: &http::request::Parts, body: Bytes) -> RestRequest {
    let path = decode_uri_component(parts.uri.path());

    RestRequest::new(parts.method.clone(), path)
        .with_preferences(preferences_from_headers(&parts.headers))
        .with_conditions(conditions_from_headers(&parts.headers))
        .with_host(host_info(parts))
        .with_entity(body)
}
