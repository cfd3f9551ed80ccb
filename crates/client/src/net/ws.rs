use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use bomber::{CLOSE_ABNORMAL, Channel, Inbound, Transport, TransportError};

/// Close code for a close frame that carried no status.
const CLOSE_NO_STATUS: u16 = 1005;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens WebSocket connections to the game server.
#[derive(Debug, Default)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for WsTransport {
    type Channel = WsChannel;

    async fn connect(&mut self, url: &str) -> Result<WsChannel, TransportError> {
        let (socket, response) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        log::debug!("WebSocket handshake answered with {}", response.status());

        Ok(WsChannel {
            socket,
            failure: None,
        })
    }
}

pub struct WsChannel {
    socket: Socket,
    /// Set after a socket error so the next poll reports the close.
    failure: Option<String>,
}

#[async_trait]
impl Channel for WsChannel {
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        self.socket
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn recv(&mut self) -> Inbound {
        if let Some(reason) = self.failure.take() {
            return Inbound::Closed {
                code: CLOSE_ABNORMAL,
                reason,
            };
        }

        loop {
            match self.socket.next().await {
                Some(Ok(Message::Text(text))) => return Inbound::Text(text.as_str().to_owned()),
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.as_str().to_owned()))
                        .unwrap_or((CLOSE_NO_STATUS, String::new()));
                    return Inbound::Closed { code, reason };
                }
                Some(Ok(Message::Binary(bytes))) => {
                    log::debug!("Ignoring {} byte binary frame", bytes.len());
                }
                // Pings are answered by tungstenite itself.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let reason = e.to_string();
                    self.failure = Some(reason.clone());
                    return Inbound::Error(reason);
                }
                None => {
                    return Inbound::Closed {
                        code: CLOSE_ABNORMAL,
                        reason: String::new(),
                    };
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.socket.close(None).await {
            log::debug!("Close handshake failed: {}", e);
        }
    }
}
