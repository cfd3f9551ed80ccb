use tokio::sync::mpsc::WeakUnboundedSender;

use bomber::{Command, GameOutcome, GameView, Renderer, ScoreEntry, Status, StatusUi};

/// Frontend for running without a terminal: reports everything through `log`.
///
/// With an auto-join configured it asks to join once per opened connection,
/// so a client started before its server still ends up in the game.
#[derive(Debug, Default)]
pub struct LogFrontend {
    last_status: Option<Status>,
    auto_join: Option<(WeakUnboundedSender<Command>, String)>,
    joined: bool,
}

impl LogFrontend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sender is weak so it never keeps the session's command stream open.
    pub fn with_auto_join(commands: WeakUnboundedSender<Command>, name: String) -> Self {
        Self {
            auto_join: Some((commands, name)),
            ..Self::default()
        }
    }

    fn on_connection(&mut self, status: Status) {
        match status {
            Status::Disconnected => self.joined = false,
            Status::Connected if !self.joined => {
                let Some((commands, name)) = &self.auto_join else {
                    return;
                };
                if let Some(commands) = commands.upgrade() {
                    log::info!("Joining as {}", name);
                    self.joined = commands.send(Command::Join(name.clone())).is_ok();
                }
            }
            _ => {}
        }
    }
}

impl Renderer for LogFrontend {
    fn draw_game(&mut self, view: &GameView<'_>) {
        if !view.is_present() {
            log::debug!("No game state");
            return;
        }

        let mirror = view.mirror();
        log::debug!(
            "Tick {}: {} players ({} alive), {} bombs, {} explosions",
            view.tick(),
            mirror.players.len(),
            mirror.alive_count(),
            mirror.bombs.len(),
            view.explosions().count()
        );
    }

    fn death_effect(&mut self) {
        log::info!("A player died");
    }
}

impl StatusUi for LogFrontend {
    fn update_status(&mut self, status: Status) {
        self.on_connection(status);
        if self.last_status == Some(status) {
            return;
        }
        self.last_status = Some(status);
        match status {
            Status::GameOver => log::info!("Game over"),
            _ => log::info!("{}", status.message()),
        }
    }

    fn update_scoreboard(&mut self, entries: &[ScoreEntry]) {
        let summary: Vec<String> = entries
            .iter()
            .map(|entry| format!("{} {}", entry.name, entry.kills))
            .collect();
        log::info!("Scores: {}", summary.join(", "));
    }

    fn show_game_over(&mut self, outcome: &GameOutcome) {
        log::info!("{}", outcome.message());
    }

    fn hide_game_over(&mut self) {}
}
