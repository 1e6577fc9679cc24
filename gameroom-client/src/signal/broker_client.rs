use futures::{SinkExt, StreamExt};
use gameroom_core::{ClientFrame, RoomId, ServerFrame};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("invalid signaller url: {0}")]
    Url(#[from] url::ParseError),
    #[error("signaller connection error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("failed to encode signaling frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Typed WebSocket connection to the session broker.
pub struct BrokerClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl BrokerClient {
    pub async fn connect(endpoint: &str) -> Result<Self, SignalError> {
        let url = Url::parse(endpoint)?;
        let (ws, _) = connect_async(url.as_str()).await?;
        Ok(Self { ws })
    }

    pub async fn send(&mut self, frame: &ClientFrame) -> Result<(), SignalError> {
        let json = serde_json::to_string(frame)?;
        self.ws.send(Message::Text(json.into())).await?;
        Ok(())
    }

    /// Next parsed frame from the broker. Unparsable frames are skipped with
    /// a warning; `None` means the broker closed the connection.
    pub async fn next(&mut self) -> Result<Option<ServerFrame>, SignalError> {
        while let Some(msg) = self.ws.next().await {
            match msg? {
                Message::Text(text) => match serde_json::from_str(&text) {
                    Ok(frame) => return Ok(Some(frame)),
                    Err(e) => warn!("Skipping unparsable signaller frame: {e}"),
                },
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }

    /// Snapshot of rooms currently known to the broker.
    pub async fn rooms(&mut self) -> Result<Vec<RoomId>, SignalError> {
        self.send(&ClientFrame::List).await?;
        loop {
            match self.next().await? {
                Some(ServerFrame::Rooms { list }) => return Ok(list),
                Some(_) => continue,
                None => return Ok(Vec::new()),
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
