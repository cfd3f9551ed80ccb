use std::collections::BTreeMap;

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::state::{Board, Bomb, Player, PlayerId, Tombstone};
use crate::tick::Tick;

/// One outbound frame, as the server expects it on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Move { dx: i8, dy: i8 },
    PlaceBomb,
    JoinGame { name: String },
    ResetGame,
}

#[derive(Serialize)]
struct MoveBody {
    dx: i8,
    dy: i8,
}

#[derive(Serialize)]
struct JoinBody<'a> {
    name: &'a str,
}

// Unit events go out as `{"PlaceBomb":null}` rather than serde's bare-string form.
impl Serialize for ClientEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Move { dx, dy } => serializer.serialize_newtype_variant(
                "ClientEvent",
                0,
                "Move",
                &MoveBody { dx: *dx, dy: *dy },
            ),
            Self::PlaceBomb => {
                serializer.serialize_newtype_variant("ClientEvent", 1, "PlaceBomb", &())
            }
            Self::JoinGame { name } => serializer.serialize_newtype_variant(
                "ClientEvent",
                2,
                "JoinGame",
                &JoinBody { name },
            ),
            Self::ResetGame => {
                serializer.serialize_newtype_variant("ClientEvent", 3, "ResetGame", &())
            }
        }
    }
}

/// Full authoritative state carried by `GameMap`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameSnapshot {
    #[serde(default)]
    pub players: BTreeMap<PlayerId, Player>,
    pub map: Board,
    pub tick_count: Tick,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
    #[serde(default)]
    pub tombstones: Option<Vec<Tombstone>>,
}

/// An explosion cell as sent by the server.
///
/// Older servers also send a per-cell `timer`. It is ignored: the client
/// stamps each cell with the tick at which it was first seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ExplosionSite {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum ServerEvent {
    GameMap(GameSnapshot),
    PlayerMoved {
        player_id: PlayerId,
        x: u32,
        y: u32,
    },
    BombPlaced {
        bomb: Bomb,
    },
    BombExploded {
        #[serde(default)]
        explosions: Vec<ExplosionSite>,
        #[serde(default)]
        bombs: Option<Vec<Bomb>>,
        #[serde(default)]
        game_map: Option<Board>,
    },
    Tick {
        tick_count: Tick,
    },
    PlayerDied {
        player_id: PlayerId,
    },
    PlayerRevived {
        player_id: PlayerId,
        x: u32,
        y: u32,
    },
    Reconnect {
        player_id: PlayerId,
        #[serde(default)]
        success: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Bare player id sent by older servers right after connecting.
    Identity(u64),
    Event(ServerEvent),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GameMap(_) => "GameMap",
            Self::PlayerMoved { .. } => "PlayerMoved",
            Self::BombPlaced { .. } => "BombPlaced",
            Self::BombExploded { .. } => "BombExploded",
            Self::Tick { .. } => "Tick",
            Self::PlayerDied { .. } => "PlayerDied",
            Self::PlayerRevived { .. } => "PlayerRevived",
            Self::Reconnect { .. } => "Reconnect",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Decode(serde_json::Error),
    #[error("encoding failed: {0}")]
    Encode(serde_json::Error),
}

pub fn decode(frame: &str) -> Result<ServerMessage, ProtocolError> {
    if let Ok(id) = serde_json::from_str::<u64>(frame) {
        return Ok(ServerMessage::Identity(id));
    }
    serde_json::from_str::<ServerEvent>(frame)
        .map(ServerMessage::Event)
        .map_err(ProtocolError::Decode)
}

pub fn encode(event: &ClientEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(event).map_err(ProtocolError::Encode)
}
