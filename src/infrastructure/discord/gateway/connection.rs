use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, trace};

use super::constants::CONNECTION_TIMEOUT;
use super::error::{GatewayError, GatewayResult};
use super::payloads::GatewayPayload;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, WsMessage>;
type WsReader = SplitStream<WsStream>;

/// Opens transports to a gateway URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GatewayConnector: Send + Sync {
    async fn connect(&self, url: &str) -> GatewayResult<Box<dyn GatewayTransport>>;
}

/// One open, bidirectional text connection to the gateway.
#[async_trait]
pub trait GatewayTransport: Send {
    async fn send(&mut self, payload: &GatewayPayload) -> GatewayResult<()>;

    /// Waits for the next text frame. A close frame or the end of the stream
    /// is reported as [`GatewayError::ConnectionClosed`].
    async fn receive(&mut self) -> GatewayResult<String>;

    async fn close(&mut self, code: u16, reason: &str) -> GatewayResult<()>;

    fn is_connected(&self) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GatewayConnector for WebSocketConnector {
    async fn connect(&self, url: &str) -> GatewayResult<Box<dyn GatewayTransport>> {
        let (ws_stream, _) = timeout(CONNECTION_TIMEOUT, connect_async(url))
            .await
            .map_err(|_| GatewayError::timeout("connection"))?
            .map_err(|e| GatewayError::connection_failed(e.to_string()))?;

        debug!(url, "WebSocket connection opened");

        let (writer, reader) = ws_stream.split();
        Ok(Box::new(WebSocketTransport {
            writer,
            reader,
            connected: true,
        }))
    }
}

pub struct WebSocketTransport {
    writer: WsWriter,
    reader: WsReader,
    connected: bool,
}

#[async_trait]
impl GatewayTransport for WebSocketTransport {
    async fn send(&mut self, payload: &GatewayPayload) -> GatewayResult<()> {
        if !self.connected {
            return Err(GatewayError::NotConnected);
        }

        let json = serde_json::to_string(payload)
            .map_err(|e| GatewayError::serialization(e.to_string()))?;

        self.writer
            .send(WsMessage::Text(json.into()))
            .await
            .map_err(|e| GatewayError::websocket(e.to_string()))
    }

    async fn receive(&mut self) -> GatewayResult<String> {
        loop {
            match self.reader.next().await {
                Some(Ok(WsMessage::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(WsMessage::Close(frame))) => {
                    self.connected = false;
                    let (code, reason) = frame.map_or_else(
                        || (1000, "Normal closure".to_string()),
                        |f| (f.code.into(), f.reason.as_str().to_owned()),
                    );
                    return Err(GatewayError::closed(code, reason));
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    trace!(len = data.len(), "Ignoring binary frame");
                }
                // tungstenite queues the pong reply itself.
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                Some(Err(e)) => {
                    self.connected = false;
                    return Err(GatewayError::websocket(e.to_string()));
                }
                None => {
                    self.connected = false;
                    return Err(GatewayError::closed(1000, "Stream ended"));
                }
            }
        }
    }

    async fn close(&mut self, code: u16, reason: &str) -> GatewayResult<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;

        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_string().into(),
        };
        let result = self
            .writer
            .send(WsMessage::Close(Some(frame)))
            .await
            .map_err(|e| GatewayError::websocket(e.to_string()));
        let _ = self.writer.close().await;

        debug!(code, "WebSocket connection closed");
        result
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
