use crate::broker::BrokerHandle;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use gameroom_core::{ClientFrame, ConnId};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(broker): State<BrokerHandle>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, broker))
}

async fn handle_socket(socket: WebSocket, broker: BrokerHandle) {
    let conn = ConnId::new();
    info!("New signaling connection: {conn}");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    broker.connected(conn, tx).await;

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match serde_json::to_string(&frame) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!("Failed to serialize signaling frame: {e}"),
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let broker = broker.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    // One bad frame is dropped with a warning; the
                    // connection stays up.
                    Message::Text(text) => match serde_json::from_str::<ClientFrame>(&text) {
                        Ok(frame) => broker.frame(conn, frame).await,
                        Err(e) => warn!("Dropping malformed frame from {conn}: {e}"),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    broker.disconnected(conn).await;
    info!("Signaling connection closed: {conn}");
}
