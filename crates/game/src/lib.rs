pub mod assets;
pub mod config;
pub mod input;
pub mod net;
pub mod state;
pub mod tick;
pub mod trigger;

pub use assets::{AssetError, AssetRegistry, AssetsReady};
pub use config::{SessionConfig, TimingConfig};
pub use input::{Command, Direction, MoveThrottle};
pub use net::{
    CLOSE_ABNORMAL, Channel, ClientEvent, ConnectionState, FileTokenStore, Inbound,
    MemoryTokenStore, ServerEvent, ServerMessage, Session, SessionToken, Step, TokenError,
    TokenStore, Transport, TransportError,
};
pub use state::{
    Board, Bomb, GameOutcome, GameView, Mirror, Player, PlayerId, ScoreEntry, Synchronizer, Tile,
};
pub use tick::{Countdowns, Tick, TickClock};
pub use trigger::{Frontend, Renderer, Status, StatusUi, Triggers};
