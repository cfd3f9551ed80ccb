use std::future;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{self, Instant};

use crate::config::{SessionConfig, TimingConfig};
use crate::input::{Command, MoveThrottle};
use crate::state::Synchronizer;
use crate::trigger::{self, Frontend, Triggers};

use super::protocol::{decode, encode};
use super::token::SessionToken;
use super::transport::{CLOSE_ABNORMAL, Channel, Inbound, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    /// An attempt is in flight; further attempts are refused.
    Connecting,
    Open,
}

/// Whether the driver should keep stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Shutdown,
}

/// One client's link to the game server.
///
/// Owns the channel, the reconnect deadline and the [`Synchronizer`].
/// Everything runs on the caller's task: [`Session::step`] waits for the
/// next inbound frame, reconnect deadline or command and handles it to
/// completion before returning, so no two events are ever processed at
/// the same time.
pub struct Session<T: Transport> {
    transport: T,
    config: SessionConfig,
    token: SessionToken,
    state: ConnectionState,
    channel: Option<T::Channel>,
    reconnect_at: Option<Instant>,
    throttle: MoveThrottle,
    sync: Synchronizer,
}

impl<T: Transport> Session<T> {
    pub fn new(
        transport: T,
        config: SessionConfig,
        timing: TimingConfig,
        token: SessionToken,
    ) -> Self {
        let throttle = MoveThrottle::new(config.move_interval);
        Self {
            transport,
            config,
            token,
            state: ConnectionState::Disconnected,
            channel: None,
            reconnect_at: None,
            throttle,
            sync: Synchronizer::new(timing),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.sync
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// When the pending reconnect attempt fires, if one is scheduled.
    pub fn reconnect_at(&self) -> Option<Instant> {
        self.reconnect_at
    }

    pub fn url(&self) -> String {
        self.token.apply_to(&self.config.url)
    }

    /// Opens a channel unless one is open or already being opened.
    pub async fn connect<F: Frontend + ?Sized>(&mut self, frontend: &mut F) {
        if self.state != ConnectionState::Disconnected {
            log::debug!("Connect skipped, session is {:?}", self.state);
            return;
        }

        self.state = ConnectionState::Connecting;
        self.reconnect_at = None;

        let url = self.url();
        log::info!("Connecting to {}", url);

        match self.transport.connect(&url).await {
            Ok(channel) => {
                self.channel = Some(channel);
                self.state = ConnectionState::Open;
                log::info!("Connected to {}", self.config.url);
                self.fire(frontend, Triggers::UI);
            }
            Err(e) => {
                log::warn!("Connection to {} failed: {}", self.config.url, e);
                self.fire(frontend, Triggers::UI);
                self.on_closed(frontend, CLOSE_ABNORMAL, &e.to_string());
            }
        }
    }

    /// Waits for and handles exactly one event.
    pub async fn step<F: Frontend + ?Sized>(
        &mut self,
        frontend: &mut F,
        commands: &mut UnboundedReceiver<Command>,
    ) -> Step {
        let reconnect_at = self.reconnect_at;

        tokio::select! {
            inbound = next_inbound(&mut self.channel) => {
                self.on_inbound(frontend, inbound);
            }
            () = reconnect_due(reconnect_at) => {
                log::info!("Attempting to reconnect");
                self.connect(frontend).await;
            }
            command = commands.recv() => match command {
                Some(command) => self.submit(command).await,
                None => return Step::Shutdown,
            },
        }

        Step::Continue
    }

    /// Connects and steps until the command stream ends.
    pub async fn run<F: Frontend + ?Sized>(
        &mut self,
        frontend: &mut F,
        mut commands: UnboundedReceiver<Command>,
    ) {
        self.connect(frontend).await;
        while self.step(frontend, &mut commands).await == Step::Continue {}
        self.shutdown().await;
    }

    pub async fn shutdown(&mut self) {
        self.reconnect_at = None;
        if let Some(mut channel) = self.channel.take() {
            log::info!("Closing connection");
            channel.close().await;
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Sends the event for `command`, or drops it when it cannot go out.
    pub async fn submit(&mut self, command: Command) {
        if !self.is_open() {
            log::debug!("Discarding {:?}, not connected", command);
            return;
        }
        if command.is_gameplay() && !self.sync.accepts_input() {
            log::debug!("Discarding {:?}, no running match", command);
            return;
        }
        if matches!(command, Command::Move(_)) && !self.throttle.permit(Instant::now()) {
            log::trace!("Move throttled");
            return;
        }

        let frame = match encode(&command.to_event()) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Failed to encode {:?}: {}", command, e);
                return;
            }
        };

        if let Some(channel) = self.channel.as_mut() {
            if let Err(e) = channel.send(frame).await {
                log::warn!("Failed to send {:?}: {}", command, e);
            }
        }
    }

    fn on_inbound<F: Frontend + ?Sized>(&mut self, frontend: &mut F, inbound: Inbound) {
        match inbound {
            Inbound::Text(frame) => match decode(&frame) {
                Ok(message) => {
                    let triggers = self.sync.apply(message);
                    self.fire(frontend, triggers);
                }
                Err(e) => log::warn!("Dropping undecodable frame: {}", e),
            },
            Inbound::Error(reason) => {
                log::error!("Connection error: {}", reason);
                self.fire(frontend, Triggers::UI);
            }
            Inbound::Closed { code, reason } => self.on_closed(frontend, code, &reason),
        }
    }

    fn on_closed<F: Frontend + ?Sized>(&mut self, frontend: &mut F, code: u16, reason: &str) {
        log::info!("Connection closed (code {}): {}", code, reason);

        self.channel = None;
        self.state = ConnectionState::Disconnected;

        let triggers = self.sync.disconnect();
        self.fire(frontend, triggers);

        self.reconnect_at = Some(Instant::now() + self.config.reconnect_delay);
        log::info!(
            "Reconnecting in {} ms",
            self.config.reconnect_delay.as_millis()
        );
    }

    fn fire<F: Frontend + ?Sized>(&self, frontend: &mut F, triggers: Triggers) {
        if triggers.is_empty() {
            return;
        }
        trigger::dispatch(frontend, triggers, self.is_open(), &self.sync.view());
    }
}

async fn next_inbound<C: Channel>(channel: &mut Option<C>) -> Inbound {
    match channel {
        Some(channel) => channel.recv().await,
        None => future::pending().await,
    }
}

async fn reconnect_due(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}
