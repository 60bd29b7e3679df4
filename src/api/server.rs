//! HTTP server lifecycle: bind → spawn background task → return handle with
//! shutdown channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::build_router;
use crate::api::types::ApiContext;

/// Handle to a running server.
pub struct ApiServer {
    pub addr: SocketAddr,
    pub started_at: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// Ask the server to stop accepting connections. In-flight requests
    /// finish first.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// Wait until the server task has exited.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!("Server task ended abnormally: {e}");
        }
    }
}

/// Bind `addr` and serve the application router in a background task.
///
/// Port 0 picks an ephemeral port; the bound address is on the handle.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = build_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(ApiServer {
        addr,
        started_at: chrono::Utc::now().to_rfc3339(),
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    use crate::inference::MockInferenceClient;
    use crate::pipeline::ReportPipeline;
    use crate::report::BuiltinFontProvider;

    fn test_ctx() -> ApiContext {
        ApiContext::new(ReportPipeline::new(
            Arc::new(MockInferenceClient::new("Explanation.")),
            Arc::new(BuiltinFontProvider),
        ))
    }

    fn localhost() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_server(test_ctx(), localhost())
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);
        assert!(!server.started_at.is_empty());

        let url = format!("http://{}/api/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.shutdown();
        server.stopped().await;
    }

    #[tokio::test]
    async fn server_serves_page_and_404s() {
        let mut server = start_server(test_ctx(), localhost())
            .await
            .expect("server should start");
        let base = format!("http://{}", server.addr);

        let resp = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let resp = reqwest::get(format!("{base}/nonexistent")).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn bind_conflict_is_an_error() {
        let mut first = start_server(test_ctx(), localhost()).await.unwrap();
        let result = start_server(test_ctx(), first.addr).await;
        assert!(result.is_err());
        first.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server(test_ctx(), localhost()).await.unwrap();
        server.shutdown();
        server.shutdown(); // Second call should be safe
    }
}
