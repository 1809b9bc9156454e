//! RestStack demo server.
//!
//! Hosts a small note-taking API on top of the RestStack routing and
//! negotiation core, wiring a [`Component`] with one router:
//!
//! ```text
//! /notes        -> NotesResource   (GET list, POST create)
//! /notes/{id}   -> NoteResource    (negotiated GET, PUT, DELETE,
//!                                   conditional requests via ETag)
//! /_health      -> liveness probe  (service-level interception)
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RESTSTACK_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod notes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use reststack_core::{Component, Finder};
use reststack_http::{RestHttpConfig, RestHttpService, serve};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::notes::{NoteResource, NoteStore, NotesResource};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment-driven server configuration.
#[derive(Debug, Clone)]
struct ServerConfig {
    /// Bind address for the listener.
    listen: String,
    /// Log level filter.
    log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("RESTSTACK_LISTEN") {
            config.listen = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        config
    }
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config
/// value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Wire the demo component: one default host carrying the note routes.
fn build_component(store: &Arc<NoteStore>) -> Result<Component> {
    let component = Component::new();
    let router = component.default_router();

    let collection_store = Arc::clone(store);
    router
        .attach(
            "/notes",
            Arc::new(Finder::new(move |_| {
                Box::new(NotesResource::new(Arc::clone(&collection_store)))
            })),
        )
        .context("failed to attach /notes")?;

    let item_store = Arc::clone(store);
    router
        .attach(
            "/notes/{id}",
            Arc::new(Finder::new(move |request| {
                Box::new(NoteResource::new(Arc::clone(&item_store), request))
            })),
        )
        .context("failed to attach /notes/{id}")?;

    Ok(component)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        listen = %config.listen,
        version = VERSION,
        "starting RestStack demo server",
    );

    let store = NoteStore::with_samples();
    let component = build_component(&store)?;
    let service = RestHttpService::new(Arc::new(component), RestHttpConfig::default());

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    serve(listener, service, async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    })
    .await
    .context("server loop failed")
}
