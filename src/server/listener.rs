use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::http::connection::Connection;
use crate::server::state::ServerState;

/// How often clients with fully expired windows are dropped.
const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

pub async fn run(state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr = state.config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, state).await
}

/// Accepts forever, one task per connection. Only a failed accept ends the
/// loop; a failing connection is logged and dropped on its own.
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) -> anyhow::Result<()> {
    let evictor = tokio::spawn(evict_idle_clients(Arc::clone(&state)));

    let result = accept_loop(&listener, &state).await;
    evictor.abort();
    result
}

async fn accept_loop(listener: &TcpListener, state: &Arc<ServerState>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!("Accept failed: {}", e);
                return Err(e.into());
            }
        };
        tracing::debug!("Accepted connection from {}", peer);

        let state = Arc::clone(state);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, peer, state);
            if let Err(e) = conn.run().await {
                tracing::debug!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

async fn evict_idle_clients(state: Arc<ServerState>) {
    let mut ticker = tokio::time::interval(EVICTION_INTERVAL);
    // The first tick completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let removed = state.limiter.evict_idle().await;
        if removed > 0 {
            tracing::debug!(removed, "Evicted idle rate-limit entries");
        }
    }
}
