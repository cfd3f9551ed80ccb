use crate::config::TimingConfig;
use crate::net::{ExplosionSite, GameSnapshot, ServerEvent, ServerMessage};
use crate::tick::{Countdowns, Tick};
use crate::trigger::Triggers;

use super::colors::ColorAssigner;
use super::mirror::{Board, Bomb, Explosion, Mirror, PlayerId};
use super::view::GameView;

/// Who this client is playing as, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub player_id: Option<PlayerId>,
    pub name: Option<String>,
}

/// Sole owner and mutator of the [`Mirror`].
///
/// Each server event maps to one handler. After any event that can change
/// what is on screen, [`Synchronizer::settle`] runs: it drops burnt-out
/// explosions, gives newly seen players a colour and checks whether the
/// alive count dropped.
#[derive(Debug)]
pub struct Synchronizer {
    mirror: Mirror,
    identity: Identity,
    colors: ColorAssigner,
    countdowns: Countdowns,
    alive_baseline: usize,
}

impl Synchronizer {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            mirror: Mirror::new(),
            identity: Identity::default(),
            colors: ColorAssigner::new(),
            countdowns: Countdowns::new(timing),
            alive_baseline: 0,
        }
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn colors(&self) -> &ColorAssigner {
        &self.colors
    }

    pub fn countdowns(&self) -> &Countdowns {
        &self.countdowns
    }

    pub fn view(&self) -> GameView<'_> {
        GameView::new(
            &self.mirror,
            self.identity.player_id,
            &self.colors,
            &self.countdowns,
        )
    }

    /// Gameplay input only makes sense against a live, unfinished match.
    pub fn accepts_input(&self) -> bool {
        self.mirror.is_present() && !self.mirror.game_over
    }

    pub fn apply(&mut self, message: ServerMessage) -> Triggers {
        let triggers = match message {
            ServerMessage::Identity(id) => {
                log::debug!("Ignoring legacy identity frame {}", id);
                Triggers::empty()
            }
            ServerMessage::Event(event) => self.apply_event(event),
        };

        if triggers.contains(Triggers::REDRAW) {
            triggers | self.settle()
        } else {
            triggers
        }
    }

    fn apply_event(&mut self, event: ServerEvent) -> Triggers {
        log::trace!("Applying {}", event.name());

        match event {
            ServerEvent::GameMap(snapshot) => self.on_snapshot(snapshot),
            ServerEvent::Tick { tick_count } => self.on_tick(tick_count),
            ServerEvent::PlayerMoved { player_id, x, y } => self.on_player_moved(player_id, x, y),
            ServerEvent::PlayerDied { player_id } => self.on_player_died(player_id),
            ServerEvent::PlayerRevived { player_id, x, y } => {
                self.on_player_revived(player_id, x, y)
            }
            ServerEvent::BombPlaced { bomb } => self.on_bomb_placed(bomb),
            ServerEvent::BombExploded {
                explosions,
                bombs,
                game_map,
            } => self.on_bomb_exploded(&explosions, bombs, game_map),
            ServerEvent::Reconnect { player_id, success } => self.on_reconnect(player_id, success),
        }
    }

    fn on_snapshot(&mut self, snapshot: GameSnapshot) -> Triggers {
        let now = snapshot.tick_count;
        self.mirror.clock.set(now);
        // A rewound clock must not leave fire stamped in its future.
        for explosion in &mut self.mirror.explosions {
            explosion.start_tick = explosion.start_tick.min(now);
        }
        self.mirror.present = true;
        self.mirror.players = snapshot.players;
        self.mirror.board = snapshot.map;
        self.mirror.game_over = snapshot.game_over;
        self.mirror.winner_id = snapshot.winner_id;
        self.mirror.tombstones = snapshot.tombstones.unwrap_or_default();

        Triggers::REDRAW | Triggers::UI
    }

    fn on_tick(&mut self, tick_count: Tick) -> Triggers {
        self.mirror.clock.observe(tick_count);
        Triggers::REDRAW
    }

    fn on_player_moved(&mut self, player_id: PlayerId, x: u32, y: u32) -> Triggers {
        match self.mirror.players.get_mut(&player_id) {
            Some(player) => {
                player.x = x;
                player.y = y;
            }
            None => log::debug!("PlayerMoved for unknown player {}", player_id),
        }
        Triggers::REDRAW
    }

    fn on_player_died(&mut self, player_id: PlayerId) -> Triggers {
        match self.mirror.players.get_mut(&player_id) {
            Some(player) => player.alive = false,
            None => log::debug!("PlayerDied for unknown player {}", player_id),
        }
        Triggers::REDRAW | Triggers::UI
    }

    fn on_player_revived(&mut self, player_id: PlayerId, x: u32, y: u32) -> Triggers {
        match self.mirror.players.get_mut(&player_id) {
            Some(player) => {
                player.alive = true;
                player.x = x;
                player.y = y;
                log::debug!("Player {} revived at ({}, {})", player_id, x, y);
            }
            None => log::debug!("PlayerRevived for unknown player {}", player_id),
        }
        Triggers::REDRAW | Triggers::UI
    }

    fn on_bomb_placed(&mut self, bomb: Bomb) -> Triggers {
        self.mirror.bombs.push(bomb);
        Triggers::REDRAW
    }

    fn on_bomb_exploded(
        &mut self,
        explosions: &[ExplosionSite],
        bombs: Option<Vec<Bomb>>,
        game_map: Option<Board>,
    ) -> Triggers {
        let start_tick = self.mirror.tick_count();
        self.mirror
            .explosions
            .extend(explosions.iter().map(|site| Explosion {
                x: site.x,
                y: site.y,
                start_tick,
            }));

        if let Some(bombs) = bombs {
            self.mirror.bombs = bombs;
        }
        if let Some(board) = game_map {
            self.mirror.board = board;
        }

        Triggers::REDRAW
    }

    fn on_reconnect(&mut self, player_id: PlayerId, success: bool) -> Triggers {
        if !success {
            log::warn!("Server reported unsuccessful reconnect for player {}", player_id);
        }

        self.identity.player_id = Some(player_id);
        if let Some(player) = self.mirror.players.get(&player_id) {
            self.identity.name = Some(player.name.clone());
            self.colors.assign(player_id);
            log::info!("Restored identity as {} ({})", player.name, player_id);
        }

        Triggers::REDRAW | Triggers::UI
    }

    /// Housekeeping pass run after every visual change.
    pub fn settle(&mut self) -> Triggers {
        self.purge_explosions();

        for id in self.mirror.players.keys() {
            self.colors.assign(*id);
        }

        if self.track_alive() {
            Triggers::DEATH
        } else {
            Triggers::empty()
        }
    }

    fn purge_explosions(&mut self) {
        let now = self.mirror.tick_count();
        let countdowns = &self.countdowns;
        let before = self.mirror.explosions.len();
        self.mirror
            .explosions
            .retain(|e| !countdowns.explosion_expired(now, e.start_tick));

        let purged = before - self.mirror.explosions.len();
        if purged > 0 {
            log::trace!("Purged {} expired explosions at tick {}", purged, now);
        }
    }

    fn track_alive(&mut self) -> bool {
        let alive = self.mirror.alive_count();
        let died = self.alive_baseline != 0 && alive < self.alive_baseline;
        self.alive_baseline = alive;
        died
    }

    /// Forget everything tied to the lost connection.
    ///
    /// Colour assignments survive; they belong to the client, not the
    /// connection.
    pub fn disconnect(&mut self) -> Triggers {
        self.identity = Identity::default();
        self.mirror.clear();
        self.alive_baseline = 0;
        Triggers::REDRAW | Triggers::UI
    }
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}
