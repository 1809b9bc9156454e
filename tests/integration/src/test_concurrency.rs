//! Live reconfiguration under concurrent dispatch.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use reststack_core::{Finder, Resource, Router, Target};
    use reststack_core::{RestRequest, RestResponse};
    use reststack_model::{Representation, RestError, Variant};

    use crate::{TestServer, client};

    #[derive(Default)]
    struct Stable;

    #[async_trait]
    impl Resource for Stable {
        fn negotiates_content(&self) -> bool {
            false
        }

        async fn get(
            &mut self,
            _request: &RestRequest,
            _variant: Option<&Variant>,
        ) -> Result<RestResponse, RestError> {
            Ok(RestResponse::ok(Representation::plain_text("stable")))
        }
    }

    #[derive(Default)]
    struct Transient;

    #[async_trait]
    impl Resource for Transient {
        fn negotiates_content(&self) -> bool {
            false
        }

        async fn get(
            &mut self,
            _request: &RestRequest,
            _variant: Option<&Variant>,
        ) -> Result<RestResponse, RestError> {
            Ok(RestResponse::ok(Representation::plain_text("transient")))
        }
    }

    /// Requests racing attach/detach must only ever observe the
    /// fully-attached or fully-detached route set — every response is a
    /// clean 200 or 404, never a torn state surfacing as a server error.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_never_observe_partial_route_table_during_reconfiguration() {
        let router = Arc::new(Router::new());
        router
            .attach("/stable", Arc::new(Finder::of::<Stable>()))
            .expect("should attach");

        let server = TestServer::start(Arc::clone(&router) as Arc<dyn Target>).await;

        let stable_url = server.url("/stable");
        let transient_url = server.url("/transient");

        let mut request_tasks = Vec::new();
        for _ in 0..4 {
            let stable_url = stable_url.clone();
            let transient_url = transient_url.clone();
            request_tasks.push(tokio::spawn(async move {
                let http = client();
                for _ in 0..50 {
                    let stable = http
                        .get(&stable_url)
                        .send()
                        .await
                        .expect("request should succeed");
                    assert_eq!(stable.status(), reqwest::StatusCode::OK);

                    let transient = http
                        .get(&transient_url)
                        .send()
                        .await
                        .expect("request should succeed");
                    assert!(
                        transient.status() == reqwest::StatusCode::OK
                            || transient.status() == reqwest::StatusCode::NOT_FOUND,
                        "unexpected status {}",
                        transient.status()
                    );
                }
            }));
        }

        let reconfigure_router = Arc::clone(&router);
        let reconfigure_task = tokio::spawn(async move {
            for _ in 0..50 {
                let target: Arc<dyn Target> = Arc::new(Finder::of::<Transient>());
                reconfigure_router
                    .attach("/transient", Arc::clone(&target))
                    .expect("should attach");
                tokio::task::yield_now().await;
                reconfigure_router.detach(&target);
            }
        });

        for task in request_tasks {
            task.await.expect("request task should not panic");
        }
        reconfigure_task.await.expect("reconfigure task should not panic");

        // Only the stable route remains after the churn.
        assert_eq!(router.route_count(), 1);
    }
}
