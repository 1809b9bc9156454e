//! Routing integration tests: specificity, capture variables, nesting.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use reststack_core::{Finder, Resource, RestRequest, RestResponse, Router};
    use reststack_model::{Representation, RestError, Variant};

    use crate::{TestServer, client};

    /// A resource answering with a fixed label plus any captured variables.
    struct Labelled(&'static str);

    #[async_trait]
    impl Resource for Labelled {
        fn negotiates_content(&self) -> bool {
            false
        }

        async fn get(
            &mut self,
            request: &RestRequest,
            _variant: Option<&Variant>,
        ) -> Result<RestResponse, RestError> {
            let mut parts = vec![self.0.to_owned()];
            let mut attributes: Vec<String> = request
                .attributes()
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            attributes.sort();
            parts.extend(attributes);
            Ok(RestResponse::ok(Representation::plain_text(parts.join(" "))))
        }
    }

    fn labelled(label: &'static str) -> Arc<Finder> {
        Arc::new(Finder::new(move |_| Box::new(Labelled(label))))
    }

    async fn routed_server() -> TestServer {
        let router = Router::new();
        router
            .attach("/users/{name}", labelled("by-name"))
            .expect("should attach");
        router
            .attach("/users/active", labelled("active"))
            .expect("should attach");

        let nested = Router::new();
        nested
            .attach("/posts/{post}", labelled("post"))
            .expect("should attach");
        router
            .attach_prefix("/blogs/{blog}", Arc::new(nested))
            .expect("should attach");

        TestServer::start(Arc::new(router)).await
    }

    #[tokio::test]
    async fn test_should_prefer_more_literal_template() {
        // The literal template wins over the variable one.
        let server = routed_server().await;
        let body = client()
            .get(server.url("/users/active"))
            .send()
            .await
            .expect("request should succeed")
            .text()
            .await
            .expect("body should decode");
        assert_eq!(body, "active");
    }

    #[tokio::test]
    async fn test_should_capture_path_variable() {
        let server = routed_server().await;
        let body = client()
            .get(server.url("/users/alice"))
            .send()
            .await
            .expect("request should succeed")
            .text()
            .await
            .expect("body should decode");
        assert_eq!(body, "by-name name=alice");
    }

    #[tokio::test]
    async fn test_should_accumulate_captures_across_nested_routers() {
        let server = routed_server().await;
        let body = client()
            .get(server.url("/blogs/rust/posts/42"))
            .send()
            .await
            .expect("request should succeed")
            .text()
            .await
            .expect("body should decode");
        assert_eq!(body, "post blog=rust post=42");
    }

    #[tokio::test]
    async fn test_should_return_not_found_for_unrouted_path() {
        let server = routed_server().await;
        let response = client()
            .get(server.url("/nowhere"))
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        assert_eq!(
            response
                .headers()
                .get("x-rest-code")
                .and_then(|v| v.to_str().ok()),
            Some("NotFound"),
        );
    }

    #[tokio::test]
    async fn test_should_reject_unsupported_method_with_allow_header() {
        let server = routed_server().await;
        let response = client()
            .post(server.url("/users/active"))
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
        let allow = response
            .headers()
            .get(reqwest::header::ALLOW)
            .and_then(|v| v.to_str().ok())
            .expect("Allow header present");
        assert!(allow.contains("GET"));
    }

    #[tokio::test]
    async fn test_should_answer_health_probe() {
        let server = routed_server().await;
        let response = client()
            .get(server.url("/_health"))
            .send()
            .await
            .expect("request should succeed");
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }
}
