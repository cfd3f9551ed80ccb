use std::collections::BTreeMap;

use serde::Deserialize;

use crate::tick::{Tick, TickClock};

pub type PlayerId = u32;
pub type BombId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Tile {
    Empty,
    Wall,
    Brick,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Board {
    #[serde(rename = "board", default)]
    rows: Vec<Vec<Tile>>,
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
}

impl Board {
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        Self {
            rows,
            width,
            height,
        }
    }

    /// Declared width, falling back to the first row when the server omits it.
    pub fn width(&self) -> usize {
        if self.width > 0 {
            self.width
        } else {
            self.rows.first().map_or(0, Vec::len)
        }
    }

    pub fn height(&self) -> usize {
        if self.height > 0 {
            self.height
        } else {
            self.rows.len()
        }
    }

    /// Tiles actually received, row by row; may disagree with the declared size.
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub alive: bool,
    #[serde(default)]
    pub figure: usize,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub immortal_until_tick: Option<Tick>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Bomb {
    pub id: BombId,
    pub x: u32,
    pub y: u32,
    pub fuse_timer: u32,
    pub owner_id: PlayerId,
}

/// A burning cell, stamped with the local tick at which it was first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explosion {
    pub x: u32,
    pub y: u32,
    pub start_tick: Tick,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tombstone {
    pub x: u32,
    pub y: u32,
    pub player_name: String,
    pub revive_tick: Tick,
}

/// Local copy of the server's game state.
///
/// Only the synchronizer holds it mutably; everything else reads it through a
/// shared reference within one processing step.
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    pub(crate) clock: TickClock,
    pub(crate) present: bool,
    pub board: Board,
    pub players: BTreeMap<PlayerId, Player>,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
    pub tombstones: Vec<Tombstone>,
    pub game_over: bool,
    pub winner_id: Option<PlayerId>,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick_count(&self) -> Tick {
        self.clock.now()
    }

    /// True once a full snapshot has arrived on the current connection.
    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn alive_count(&self) -> usize {
        self.players.values().filter(|p| p.alive).count()
    }

    pub(crate) fn clear(&mut self) {
        self.clock.reset();
        self.present = false;
        self.board = Board::default();
        self.players.clear();
        self.bombs.clear();
        self.explosions.clear();
        self.tombstones.clear();
        self.game_over = false;
        self.winner_id = None;
    }
}
