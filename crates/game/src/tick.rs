//! Server tick clock and the countdowns derived from it.
//!
//! Every blink, fade and countdown on the client is a pure function of the
//! latest server tick, never of wall-clock time, so two clients looking at the
//! same tick draw the same frame regardless of frame rate or stalls.

use crate::config::TimingConfig;

pub type Tick = u64;

/// Milliseconds covered by one server tick.
pub const TICK_DURATION_MS: u64 = 100;

/// Monotonic mirror of the server tick counter.
///
/// `Tick` deltas only move it forward; a stale value that arrives out of
/// order is ignored. A full snapshot is authoritative and may move it either
/// way through [`TickClock::set`]. [`TickClock::reset`] starts a new epoch
/// when the connection is lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickClock {
    now: Tick,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    /// Returns true when the clock advanced.
    pub fn observe(&mut self, tick: Tick) -> bool {
        if tick > self.now {
            self.now = tick;
            true
        } else {
            if tick < self.now {
                log::debug!("Ignoring stale tick {} (clock at {})", tick, self.now);
            }
            false
        }
    }

    /// Takes the server's value as is, even if it is behind the clock.
    pub fn set(&mut self, tick: Tick) {
        if tick < self.now {
            log::debug!("Tick clock rewound from {} to {}", self.now, tick);
        }
        self.now = tick;
    }

    pub fn reset(&mut self) {
        self.now = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdowns {
    timing: TimingConfig,
}

impl Countdowns {
    pub fn new(timing: TimingConfig) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Ticks an explosion stamped at `start` has left to live at `now`.
    pub fn explosion_remaining(&self, now: Tick, start: Tick) -> u64 {
        let elapsed = now.saturating_sub(start);
        self.timing.explosion_ticks.saturating_sub(elapsed)
    }

    pub fn explosion_expired(&self, now: Tick, start: Tick) -> bool {
        self.explosion_remaining(now, start) == 0
    }

    /// Fade factor in `0.0..=1.0`, 1.0 on the tick the explosion was seen.
    pub fn explosion_intensity(&self, now: Tick, start: Tick) -> f32 {
        if self.timing.explosion_ticks == 0 {
            return 0.0;
        }
        self.explosion_remaining(now, start) as f32 / self.timing.explosion_ticks as f32
    }

    pub fn bomb_visible(&self, fuse_timer: u32) -> bool {
        if fuse_timer <= self.timing.fuse_fast_threshold {
            fuse_timer % 2 == 0
        } else if fuse_timer <= self.timing.fuse_normal_threshold {
            (fuse_timer / 2) % 2 == 0
        } else {
            true
        }
    }

    pub fn is_immortal(&self, now: Tick, immortal_until: Option<Tick>) -> bool {
        immortal_until.is_some_and(|until| now < until)
    }

    pub fn player_visible(&self, now: Tick, immortal_until: Option<Tick>) -> bool {
        !self.is_immortal(now, immortal_until) || (now / 2) % 2 == 0
    }

    /// Whole seconds until a tombstone's owner revives, rounded up.
    pub fn revive_seconds_left(&self, now: Tick, revive_tick: Tick) -> u64 {
        let ticks = revive_tick.saturating_sub(now);
        (ticks * TICK_DURATION_MS).div_ceil(1000)
    }
}

impl Default for Countdowns {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}
