//! The hyper service tying request assembly, dispatch, and response
//! serialization together.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use reststack_core::Target;
use reststack_model::Status;
use tracing::{debug, error};
use uuid::Uuid;

use crate::body::RestBody;
use crate::request::from_http_parts;
use crate::response::into_http_response;

/// Configuration for the RestStack HTTP service.
#[derive(Debug, Clone)]
pub struct RestHttpConfig {
    /// Path answered directly with a liveness response, bypassing dispatch.
    /// `None` disables the interception.
    pub health_path: Option<String>,
    /// Value of the `Server` response header.
    pub server_name: String,
}

impl Default for RestHttpConfig {
    fn default() -> Self {
        Self {
            health_path: Some("/_health".to_owned()),
            server_name: "RestStack".to_owned(),
        }
    }
}

/// The HTTP service: one [`Target`] (usually a
/// [`Component`](reststack_core::Component)) behind hyper's `Service`
/// trait.
///
/// Per request it assigns a request id, optionally intercepts the health
/// check path, collects the body, assembles a
/// [`RestRequest`](reststack_core::RestRequest), dispatches to the root
/// target, and serializes the outcome.
#[derive(Clone)]
pub struct RestHttpService {
    root: Arc<dyn Target>,
    config: Arc<RestHttpConfig>,
}

impl RestHttpService {
    /// Create a service dispatching to the given root target.
    #[must_use]
    pub fn new(root: Arc<dyn Target>, config: RestHttpConfig) -> Self {
        Self {
            root,
            config: Arc::new(config),
        }
    }
}

impl std::fmt::Debug for RestHttpService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestHttpService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Service<http::Request<Incoming>> for RestHttpService {
    type Response = http::Response<RestBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let root = Arc::clone(&self.root);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, root.as_ref(), &config, &request_id).await;
            Ok(add_common_headers(response, &config, &request_id))
        })
    }
}

/// Process one request through the dispatch pipeline.
async fn process_request(
    req: http::Request<Incoming>,
    root: &dyn Target,
    config: &RestHttpConfig,
    request_id: &str,
) -> http::Response<RestBody> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing request");

    // Health check interception.
    if let Some(health_path) = config.health_path.as_deref() {
        if method == http::Method::GET && uri.path() == health_path {
            return health_check_response();
        }
    }

    let (parts, incoming) = req.into_parts();
    let body = match incoming.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            return into_http_response(
                reststack_core::RestResponse::status(Status::BadRequest)
                    .with_message("Failed to read request body"),
            );
        }
    };

    let mut request = from_http_parts(&parts, body);
    let response = root.handle(&mut request).await;

    debug!(
        status = %response.resolved_status(),
        path = request.path(),
        request_id,
        "request dispatched"
    );

    into_http_response(response)
}

/// Produce the liveness response.
fn health_check_response() -> http::Response<RestBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(RestBody::from_string(r#"{"status":"running"}"#))
        .expect("static health response should be valid")
}

/// Add the common response headers carried by every response.
fn add_common_headers(
    mut response: http::Response<RestBody>,
    config: &RestHttpConfig,
    request_id: &str,
) -> http::Response<RestBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", hv);
    }
    if let Ok(hv) = http::header::HeaderValue::from_str(&config.server_name) {
        headers.insert(http::header::SERVER, hv);
    }

    response
}
