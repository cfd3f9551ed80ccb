use std::time::Duration;

use tokio::time::Instant;

use crate::net::ClientEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid step as `(dx, dy)`, y growing downwards.
    pub fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Player intent handed to the session by an input collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    PlaceBomb,
    Join(String),
    Reset,
}

impl Command {
    /// Moves and bombs only make sense while a match is running.
    pub fn is_gameplay(&self) -> bool {
        matches!(self, Self::Move(_) | Self::PlaceBomb)
    }

    pub fn to_event(&self) -> ClientEvent {
        match self {
            Self::Move(direction) => {
                let (dx, dy) = direction.delta();
                ClientEvent::Move { dx, dy }
            }
            Self::PlaceBomb => ClientEvent::PlaceBomb,
            Self::Join(name) => ClientEvent::JoinGame { name: name.clone() },
            Self::Reset => ClientEvent::ResetGame,
        }
    }
}

/// Rate limit for outgoing moves, independent of the keyboard repeat rate.
#[derive(Debug, Clone)]
pub struct MoveThrottle {
    interval: Duration,
    last_move: Option<Instant>,
}

impl MoveThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_move: None,
        }
    }

    /// Returns true and records the send when a move may go out at `now`.
    pub fn permit(&mut self, now: Instant) -> bool {
        if self
            .last_move
            .is_some_and(|last| now.saturating_duration_since(last) < self.interval)
        {
            return false;
        }
        self.last_move = Some(now);
        true
    }
}
