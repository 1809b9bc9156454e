//! Conditional request integration tests (If-Match, If-None-Match,
//! If-Modified-Since).

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use reststack_core::{Finder, Resource, RestRequest, RestResponse, Router};
    use reststack_model::{
        MediaType, Representation, RepresentationInfo, RestError, Status, Tag, Variant,
    };

    use crate::{TestServer, client};

    /// A versioned resource with a fixed tag and modification date; records
    /// whether its GET handler ever ran.
    struct Versioned {
        exists: bool,
        invoked: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Resource for Versioned {
        fn exists(&self) -> bool {
            self.exists
        }

        fn allowed_methods(&self) -> Vec<http::Method> {
            vec![
                http::Method::GET,
                http::Method::HEAD,
                http::Method::OPTIONS,
                http::Method::PUT,
            ]
        }

        fn variants(&self, _method: &http::Method) -> Vec<Variant> {
            vec![Variant::new(MediaType::TEXT_PLAIN)]
        }

        fn representation_info(&self) -> Option<RepresentationInfo> {
            self.exists.then(|| {
                RepresentationInfo::new(
                    Some(Tag::strong("v1")),
                    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single(),
                )
            })
        }

        async fn get(
            &mut self,
            _request: &RestRequest,
            _variant: Option<&Variant>,
        ) -> Result<RestResponse, RestError> {
            self.invoked.store(true, Ordering::Relaxed);
            Ok(RestResponse::ok(
                Representation::plain_text("content")
                    .with_tag(Tag::strong("v1"))
                    .with_modification_date(
                        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
                            .single()
                            .expect("valid date"),
                    ),
            ))
        }

        async fn put(&mut self, _request: &RestRequest) -> Result<RestResponse, RestError> {
            self.invoked.store(true, Ordering::Relaxed);
            Ok(RestResponse::status(Status::NoContent))
        }
    }

    async fn versioned_server(exists: bool) -> (TestServer, Arc<AtomicBool>) {
        let invoked = Arc::new(AtomicBool::new(false));
        let invoked_for_factory = Arc::clone(&invoked);

        let router = Router::new();
        router
            .attach(
                "/item",
                Arc::new(Finder::new(move |_| {
                    Box::new(Versioned {
                        exists,
                        invoked: Arc::clone(&invoked_for_factory),
                    })
                })),
            )
            .expect("should attach");

        (TestServer::start(Arc::new(router)).await, invoked)
    }

    #[tokio::test]
    async fn test_should_emit_validators_on_get() {
        let (server, _) = versioned_server(true).await;
        let response = client()
            .get(server.url("/item"))
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::ETAG)
                .and_then(|v| v.to_str().ok()),
            Some("\"v1\""),
        );
        assert!(response.headers().contains_key(reqwest::header::LAST_MODIFIED));
    }

    #[tokio::test]
    async fn test_should_return_not_modified_for_matching_if_none_match() {
        let (server, invoked) = versioned_server(true).await;
        let response = client()
            .get(server.url("/item"))
            .header("If-None-Match", "\"v1\"")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_MODIFIED);
        assert!(!invoked.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_should_serve_content_for_stale_if_none_match() {
        let (server, invoked) = versioned_server(true).await;
        let response = client()
            .get(server.url("/item"))
            .header("If-None-Match", "\"v0\"")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(invoked.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_should_fail_wildcard_if_match_on_missing_resource() {
        // The handler must never run.
        let (server, invoked) = versioned_server(false).await;
        let response = client()
            .put(server.url("/item"))
            .header("If-Match", "*")
            .body("update")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::PRECONDITION_FAILED);
        assert!(!invoked.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_should_accept_matching_if_match_for_put() {
        let (server, invoked) = versioned_server(true).await;
        let response = client()
            .put(server.url("/item"))
            .header("If-Match", "\"v1\"")
            .body("update")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);
        assert!(invoked.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_should_fail_mismatched_if_match_for_put() {
        let (server, invoked) = versioned_server(true).await;
        let response = client()
            .put(server.url("/item"))
            .header("If-Match", "\"v0\"")
            .body("update")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::PRECONDITION_FAILED);
        assert!(!invoked.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_should_return_not_modified_when_unchanged_since() {
        let (server, _) = versioned_server(true).await;
        let response = client()
            .get(server.url("/item"))
            .header("If-Modified-Since", "Mon, 15 Jan 2024 10:30:00 GMT")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_should_serve_content_when_modified_after_header_date() {
        let (server, _) = versioned_server(true).await;
        let response = client()
            .get(server.url("/item"))
            .header("If-Modified-Since", "Mon, 01 Jan 2024 00:00:00 GMT")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }
}
