mod protocol;
mod session;
mod token;
mod transport;

pub use protocol::{
    ClientEvent, ExplosionSite, GameSnapshot, ProtocolError, ServerEvent, ServerMessage, decode,
    encode,
};
pub use session::{ConnectionState, Session, Step};
pub use token::{FileTokenStore, MemoryTokenStore, SessionToken, TokenError, TokenStore};
pub use transport::{CLOSE_ABNORMAL, Channel, Inbound, Transport, TransportError};
