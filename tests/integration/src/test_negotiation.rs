//! Content negotiation integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use http::Method;
    use reststack_core::{Finder, Resource, RestRequest, RestResponse, Router};
    use reststack_model::{
        Language, MediaType, Representation, RestError, Variant,
    };

    use crate::{TestServer, client};

    /// A document declared as HTML (English) first, JSON second.
    #[derive(Default)]
    struct Document;

    #[async_trait]
    impl Resource for Document {
        fn variants(&self, _method: &Method) -> Vec<Variant> {
            vec![
                Variant::new(MediaType::TEXT_HTML).with_language(Language::ENGLISH),
                Variant::new(MediaType::APPLICATION_JSON),
            ]
        }

        async fn get(
            &mut self,
            _request: &RestRequest,
            variant: Option<&Variant>,
        ) -> Result<RestResponse, RestError> {
            let variant = variant.cloned().unwrap_or_else(|| {
                Variant::new(MediaType::TEXT_PLAIN)
            });
            let body = match variant.media_type().sub_type() {
                "html" => "<p>doc</p>",
                "json" => r#"{"doc":true}"#,
                _ => "doc",
            };
            Ok(RestResponse::ok(Representation::new(variant, body)))
        }
    }

    async fn document_server() -> TestServer {
        let router = Router::new();
        router
            .attach("/doc", Arc::new(Finder::of::<Document>()))
            .expect("should attach");
        TestServer::start(Arc::new(router)).await
    }

    fn content_type(response: &reqwest::Response) -> String {
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    }

    #[tokio::test]
    async fn test_should_return_first_declared_variant_for_wildcard_accept() {
        // Accept: */* with no language preference.
        let server = document_server().await;
        let response = client()
            .get(server.url("/doc"))
            .header("Accept", "*/*")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(content_type(&response).starts_with("text/html"));
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::CONTENT_LANGUAGE)
                .and_then(|v| v.to_str().ok()),
            Some("en"),
        );
    }

    #[tokio::test]
    async fn test_should_select_json_when_preferred() {
        let server = document_server().await;
        let response = client()
            .get(server.url("/doc"))
            .header("Accept", "application/json")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert!(content_type(&response).starts_with("application/json"));
    }

    #[tokio::test]
    async fn test_should_respect_quality_ordering() {
        let server = document_server().await;
        let response = client()
            .get(server.url("/doc"))
            .header("Accept", "text/html;q=0.2, application/json;q=0.9")
            .send()
            .await
            .expect("request should succeed");
        assert!(content_type(&response).starts_with("application/json"));
    }

    #[tokio::test]
    async fn test_should_respond_not_acceptable_with_variant_listing() {
        // Nothing compatible with the Accept header.
        let server = document_server().await;
        let response = client()
            .get(server.url("/doc"))
            .header("Accept", "image/png")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_ACCEPTABLE);
        let body = response.text().await.expect("body should decode");
        assert!(body.contains("text/html"));
        assert!(body.contains("application/json"));
    }

    #[tokio::test]
    async fn test_should_exclude_zero_quality_media_type() {
        // q=0 disqualifies even the only compatible variant.
        let server = document_server().await;
        let response = client()
            .get(server.url("/doc"))
            .header("Accept", "text/html;q=0, application/json;q=0")
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_ACCEPTABLE);
    }

    #[tokio::test]
    async fn test_should_negotiate_language_after_media_type() {
        let server = document_server().await;
        let response = client()
            .get(server.url("/doc"))
            .header("Accept", "text/html, application/json")
            .header("Accept-Language", "en")
            .send()
            .await
            .expect("request should succeed");
        assert!(content_type(&response).starts_with("text/html"));
    }
}
