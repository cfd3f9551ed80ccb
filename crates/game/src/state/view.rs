use super::colors::{ColorAssigner, Rgb};
use super::mirror::{Board, Bomb, Mirror, Player, PlayerId, Tombstone};
use crate::tick::{Countdowns, Tick};

/// Read-only window onto the synchronizer, handed to renderers and UIs.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    mirror: &'a Mirror,
    me: Option<PlayerId>,
    colors: &'a ColorAssigner,
    countdowns: &'a Countdowns,
}

#[derive(Debug, Clone, Copy)]
pub struct BombSprite<'a> {
    pub bomb: &'a Bomb,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerSprite<'a> {
    pub player: &'a Player,
    /// False while an invulnerable player is in the off phase of its blink.
    pub visible: bool,
    pub immortal: bool,
    pub is_me: bool,
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionSprite {
    pub x: u32,
    pub y: u32,
    pub remaining: u64,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct TombstoneSprite<'a> {
    pub tombstone: &'a Tombstone,
    pub seconds_left: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub id: PlayerId,
    pub name: String,
    pub kills: u32,
    pub alive: bool,
    pub is_me: bool,
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    Victory,
    Winner { id: PlayerId, name: String },
    Draw,
}

impl GameOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::Victory => "You won!".to_string(),
            Self::Winner { name, .. } => format!("{} won!", name),
            Self::Draw => "Game Over! Draw.".to_string(),
        }
    }
}

impl<'a> GameView<'a> {
    pub(crate) fn new(
        mirror: &'a Mirror,
        me: Option<PlayerId>,
        colors: &'a ColorAssigner,
        countdowns: &'a Countdowns,
    ) -> Self {
        Self {
            mirror,
            me,
            colors,
            countdowns,
        }
    }

    pub fn mirror(&self) -> &'a Mirror {
        self.mirror
    }

    pub fn me(&self) -> Option<PlayerId> {
        self.me
    }

    pub fn tick(&self) -> Tick {
        self.mirror.tick_count()
    }

    pub fn is_present(&self) -> bool {
        self.mirror.is_present()
    }

    pub fn board(&self) -> &'a Board {
        &self.mirror.board
    }

    pub fn color_of(&self, id: PlayerId) -> Option<Rgb> {
        self.colors.get(id)
    }

    pub fn bombs(&self) -> impl Iterator<Item = BombSprite<'a>> {
        let countdowns = self.countdowns;
        self.mirror.bombs.iter().map(move |bomb| BombSprite {
            bomb,
            visible: countdowns.bomb_visible(bomb.fuse_timer),
        })
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerSprite<'a>> {
        let now = self.tick();
        let me = self.me;
        let colors = self.colors;
        let countdowns = self.countdowns;
        self.mirror.players.values().map(move |player| PlayerSprite {
            player,
            visible: countdowns.player_visible(now, player.immortal_until_tick),
            immortal: countdowns.is_immortal(now, player.immortal_until_tick),
            is_me: me == Some(player.id),
            color: colors.get(player.id),
        })
    }

    /// Explosions still burning at the current tick.
    pub fn explosions(&self) -> impl Iterator<Item = ExplosionSprite> {
        let now = self.tick();
        let countdowns = self.countdowns;
        self.mirror.explosions.iter().filter_map(move |explosion| {
            let remaining = countdowns.explosion_remaining(now, explosion.start_tick);
            (remaining > 0).then(|| ExplosionSprite {
                x: explosion.x,
                y: explosion.y,
                remaining,
                intensity: countdowns.explosion_intensity(now, explosion.start_tick),
            })
        })
    }

    pub fn tombstones(&self) -> impl Iterator<Item = TombstoneSprite<'a>> {
        let now = self.tick();
        let countdowns = self.countdowns;
        self.mirror.tombstones.iter().map(move |tombstone| TombstoneSprite {
            tombstone,
            seconds_left: countdowns.revive_seconds_left(now, tombstone.revive_tick),
        })
    }

    /// Players ordered by kills, highest first.
    pub fn scoreboard(&self) -> Vec<ScoreEntry> {
        let mut entries: Vec<ScoreEntry> = self
            .mirror
            .players
            .values()
            .map(|player| ScoreEntry {
                id: player.id,
                name: player.name.clone(),
                kills: player.kills,
                alive: player.alive,
                is_me: self.me == Some(player.id),
                color: self.colors.get(player.id),
            })
            .collect();
        entries.sort_by(|a, b| b.kills.cmp(&a.kills));
        entries
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if !self.mirror.game_over {
            return None;
        }

        let outcome = match self.mirror.winner_id {
            Some(id) if self.me == Some(id) => GameOutcome::Victory,
            Some(id) => {
                let name = self
                    .mirror
                    .player(id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| format!("Player {}", id));
                GameOutcome::Winner { id, name }
            }
            None => GameOutcome::Draw,
        };
        Some(outcome)
    }
}
