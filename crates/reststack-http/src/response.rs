//! [`RestResponse`] to HTTP response serialization.

use http::header::HeaderValue;
use reststack_core::RestResponse;
use reststack_model::{Representation, Status};

use crate::body::RestBody;
use crate::headers::format_http_date;

/// Set an optional header on a response builder if the value is `Some` and
/// well-formed.
fn set_optional_header(
    builder: http::response::Builder,
    name: http::header::HeaderName,
    value: Option<String>,
) -> http::response::Builder {
    if let Some(v) = value {
        if let Ok(hv) = HeaderValue::from_str(&v) {
            return builder.header(name, hv);
        }
    }
    builder
}

/// Describe the entity's metadata as response headers: content type (with
/// charset parameter), language, encoding, and validators.
fn entity_headers(
    mut builder: http::response::Builder,
    representation: &Representation,
) -> http::response::Builder {
    let variant = representation.variant();

    let content_type = match variant.character_set() {
        Some(charset) => format!("{}; charset={charset}", variant.media_type()),
        None => variant.media_type().to_string(),
    };
    builder = set_optional_header(builder, http::header::CONTENT_TYPE, Some(content_type));

    builder = set_optional_header(
        builder,
        http::header::CONTENT_LANGUAGE,
        variant.language().map(|l| l.tag().to_owned()),
    );
    builder = set_optional_header(
        builder,
        http::header::CONTENT_ENCODING,
        variant.encoding().map(|e| e.name().to_owned()),
    );

    let info = representation.info();
    builder = set_optional_header(
        builder,
        http::header::ETAG,
        info.tag.as_ref().map(reststack_model::Tag::format_http),
    );
    builder = set_optional_header(
        builder,
        http::header::LAST_MODIFIED,
        info.modification_date.map(format_http_date),
    );

    builder
}

/// Convert a dispatch outcome into an HTTP response.
///
/// Success entities are emitted with their variant metadata as headers.
/// Error statuses carry the stable machine-readable code in an
/// `x-rest-code` header and a short plain-text reason body — unless the
/// pipeline attached a descriptive entity (the not-acceptable variant
/// listing), which is preserved. `Allow` is populated whenever the
/// allowed-methods set is known.
#[must_use]
pub fn into_http_response(response: RestResponse) -> http::Response<RestBody> {
    let (status, message, entity, allowed_methods) = response.into_parts();

    let mut builder = http::Response::builder().status(status.http_status());

    if status.is_error() {
        builder = set_optional_header(
            builder,
            http::header::HeaderName::from_static("x-rest-code"),
            Some(status.as_str().to_owned()),
        );
    }

    if !allowed_methods.is_empty() {
        let allow = allowed_methods
            .iter()
            .map(http::Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        builder = set_optional_header(builder, http::header::ALLOW, Some(allow));
    }

    let body = match (&entity, status) {
        // 204/304 carry no body by definition.
        (_, Status::NoContent | Status::NotModified) => RestBody::empty(),
        (Some(representation), _) => {
            builder = entity_headers(builder, representation);
            RestBody::from_bytes(representation.data().clone())
        }
        (None, _) => {
            if status.is_error() {
                let reason = message.unwrap_or_else(|| status.reason_phrase().to_owned());
                builder = set_optional_header(
                    builder,
                    http::header::CONTENT_TYPE,
                    Some("text/plain; charset=utf-8".to_owned()),
                );
                RestBody::from_string(reason)
            } else {
                RestBody::empty()
            }
        }
    };

    builder.body(body).unwrap_or_else(|_| {
        http::Response::builder()
            .status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .body(RestBody::empty())
            .expect("static response should be valid")
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use reststack_model::{
        CharacterSet, Language, MediaType, Representation, Tag, Variant,
    };

    use super::*;

    #[test]
    fn test_should_emit_entity_with_content_headers() {
        let representation = Representation::new(
            Variant::new(MediaType::TEXT_HTML)
                .with_language(Language::ENGLISH)
                .with_character_set(CharacterSet::UTF_8),
            "<p>hi</p>",
        )
        .with_tag(Tag::strong("v1"))
        .with_modification_date(
            chrono::Utc
                .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
                .single()
                .expect("valid date"),
        );

        let response = into_http_response(RestResponse::ok(representation));
        assert_eq!(response.status(), http::StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(http::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/html; charset=utf-8"),
        );
        assert_eq!(
            headers.get(http::header::CONTENT_LANGUAGE).and_then(|v| v.to_str().ok()),
            Some("en"),
        );
        assert_eq!(
            headers.get(http::header::ETAG).and_then(|v| v.to_str().ok()),
            Some("\"v1\""),
        );
        assert!(headers.contains_key(http::header::LAST_MODIFIED));
    }

    #[test]
    fn test_should_emit_machine_readable_code_on_errors() {
        let response = into_http_response(RestResponse::status(Status::NotAcceptable));
        assert_eq!(response.status(), http::StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            response.headers().get("x-rest-code").and_then(|v| v.to_str().ok()),
            Some("NotAcceptable"),
        );
    }

    #[test]
    fn test_should_emit_allow_header() {
        let response = into_http_response(
            RestResponse::status(Status::MethodNotAllowed)
                .with_allowed_methods(vec![http::Method::GET, http::Method::PUT]),
        );
        assert_eq!(
            response.headers().get(http::header::ALLOW).and_then(|v| v.to_str().ok()),
            Some("GET, PUT"),
        );
    }

    #[test]
    fn test_should_not_emit_body_for_not_modified() {
        use http_body::Body;
        let entity = Representation::plain_text("stale");
        let response =
            into_http_response(RestResponse::status(Status::NotModified).with_entity(entity));
        assert!(response.body().is_end_stream());
    }

    #[test]
    fn test_should_preserve_descriptive_entity_on_not_acceptable() {
        use http_body::Body;
        let entity = Representation::plain_text("Available variants:\n- text/plain\n");
        let response =
            into_http_response(RestResponse::status(Status::NotAcceptable).with_entity(entity));
        assert_eq!(response.status(), http::StatusCode::NOT_ACCEPTABLE);
        assert!(!response.body().is_end_stream());
    }
}
