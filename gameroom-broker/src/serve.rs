use crate::broker::{Broker, BrokerHandle};
use crate::ws::ws_handler;
use anyhow::Result;
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use tracing::info;

pub fn router(broker: BrokerHandle) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(broker)
}

/// Run the relay until the process is stopped. All rooms are in-memory
/// only; a restart forgets them.
pub async fn serve(addr: SocketAddr) -> Result<()> {
    let broker = Broker::spawn();
    let app = router(broker);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Signaling relay listening on ws://{addr}/ws");
    axum::serve(listener, app).await?;
    Ok(())
}
