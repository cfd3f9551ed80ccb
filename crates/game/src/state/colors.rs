use std::collections::HashMap;

use super::mirror::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub const BOMB_PALETTE: [Rgb; 15] = [
    Rgb(0xFF, 0x6B, 0x6B),
    Rgb(0xFF, 0xD9, 0x3D),
    Rgb(0x6B, 0xCB, 0x77),
    Rgb(0x4D, 0x96, 0xFF),
    Rgb(0xFF, 0x6F, 0x91),
    Rgb(0x84, 0x5E, 0xC2),
    Rgb(0xFF, 0xC7, 0x5F),
    Rgb(0x00, 0x81, 0xCF),
    Rgb(0xC3, 0x4A, 0x36),
    Rgb(0x00, 0xC9, 0xA7),
    Rgb(0xF9, 0xF8, 0x71),
    Rgb(0xFF, 0x96, 0x71),
    Rgb(0xB3, 0x9C, 0xD0),
    Rgb(0x2C, 0x73, 0xD2),
    Rgb(0xF6, 0x72, 0x80),
];

/// Hands out palette colours to players in first-seen order.
///
/// An assignment is never revoked for the lifetime of the client, so a
/// player keeps their colour across deaths, revivals and reconnects.
#[derive(Debug, Clone, Default)]
pub struct ColorAssigner {
    assigned: HashMap<PlayerId, Rgb>,
    next_index: usize,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, player_id: PlayerId) -> Rgb {
        if let Some(color) = self.assigned.get(&player_id) {
            return *color;
        }

        let color = BOMB_PALETTE[self.next_index % BOMB_PALETTE.len()];
        self.next_index += 1;
        self.assigned.insert(player_id, color);
        log::debug!("Assigned colour {} to player {}", color.hex(), player_id);
        color
    }

    pub fn get(&self, player_id: PlayerId) -> Option<Rgb> {
        self.assigned.get(&player_id).copied()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
