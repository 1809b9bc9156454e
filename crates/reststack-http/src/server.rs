//! The accept loop with graceful shutdown.

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::service::RestHttpService;

/// Run the accept loop, serving connections until `shutdown` resolves.
///
/// Each accepted connection is served on its own task; once the shutdown
/// future resolves, no new connections are accepted and in-flight requests
/// are drained before returning. The typical shutdown future is
/// `tokio::signal::ctrl_c()`.
///
/// # Errors
///
/// Returns an error only for listener-level failures surfaced before the
/// loop starts; per-connection errors are logged and do not stop the loop.
pub async fn serve(
    listener: TcpListener,
    service: RestHttpService,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    let local_addr = listener.local_addr()?;
    info!(address = %local_addr, "listening for connections");

    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained");

    Ok(())
}
