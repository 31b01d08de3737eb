//! HTTP server lifecycle.
//!
//! Bind, spawn the serve loop in a background task, return a handle
//! holding a oneshot shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::api_router;
use crate::core_state::CoreState;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Send the shutdown signal. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Bind and start serving on `addr`. Port 0 picks an ephemeral port;
/// the handle reports the actual bound address.
pub async fn start_server(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> std::io::Result<ApiServer> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = api_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_database;

    async fn running_server() -> (ApiServer, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        open_database(&db_path).unwrap();
        let core = Arc::new(CoreState::new(db_path));
        let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
        let server = start_server(core, addr).await.unwrap();
        (server, dir)
    }

    #[tokio::test]
    async fn serves_health_over_tcp() {
        let (mut server, _dir) = running_server().await;
        let url = format!("http://{}/api/health", server.addr);

        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), 200);
        let json: serde_json::Value = response.json().await.unwrap();
        assert_eq!(json["status"], "ok");

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_stops_accepting() {
        let (mut server, _dir) = running_server().await;
        let url = format!("http://{}/api/health", server.addr);
        assert_eq!(reqwest::get(&url).await.unwrap().status(), 200);

        server.shutdown();
        // Give the serve loop a moment to wind down
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(reqwest::get(&url).await.is_err());
    }
}
