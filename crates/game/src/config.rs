use std::time::Duration;

pub const DEFAULT_URL: &str = "ws://127.0.0.1:3030/ws";
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;
pub const DEFAULT_MOVE_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub url: String,
    pub reconnect_delay: Duration,
    pub move_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            reconnect_delay: Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS),
            move_interval: Duration::from_millis(DEFAULT_MOVE_INTERVAL_MS),
        }
    }
}

/// Tick counts driving every blink and fade on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub explosion_ticks: u64,
    pub fuse_fast_threshold: u32,
    pub fuse_normal_threshold: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            explosion_ticks: 5,
            fuse_fast_threshold: 5,
            fuse_normal_threshold: 10,
        }
    }
}
