use async_trait::async_trait;

/// Close code reported when a connection drops without a close frame.
pub const CLOSE_ABNORMAL: u16 = 1006;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("send failed: {0}")]
    Send(String),
    #[error("receive failed: {0}")]
    Receive(String),
}

/// What a live channel produced next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    /// A fault the peer reported. A `Closed` always follows.
    Error(String),
    /// The channel is finished and must not be polled again.
    Closed { code: u16, reason: String },
}

/// One physical connection carrying text frames.
#[async_trait]
pub trait Channel: Send {
    async fn send(&mut self, frame: String) -> Result<(), TransportError>;
    async fn recv(&mut self) -> Inbound;
    async fn close(&mut self);
}

/// Opens channels to the game server.
#[async_trait]
pub trait Transport: Send {
    type Channel: Channel;

    async fn connect(&mut self, url: &str) -> Result<Self::Channel, TransportError>;
}
