//! Integration tests for the RestStack framework.
//!
//! Each test boots a real server on an ephemeral loopback port and drives
//! it over HTTP with `reqwest`, exercising routing, negotiation,
//! conditional requests, and live reconfiguration end to end.

use std::sync::Once;
use std::sync::Arc;

use reststack_core::Target;
use reststack_http::{RestHttpConfig, RestHttpService, serve};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

mod test_concurrency;
mod test_negotiation;
mod test_precondition;
mod test_routing;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A server running on an ephemeral loopback port for one test.
///
/// Shuts down gracefully when dropped.
pub struct TestServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Boot a server dispatching to the given root target.
    pub async fn start(root: Arc<dyn Target>) -> Self {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind an ephemeral port");
        let addr = listener.local_addr().expect("should resolve local addr");
        let service = RestHttpService::new(root, RestHttpConfig::default());

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = serve(listener, service, async {
                rx.await.ok();
            })
            .await;
        });

        Self {
            base_url: format!("http://{addr}"),
            shutdown: Some(tx),
        }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// A reqwest client with default settings.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}
