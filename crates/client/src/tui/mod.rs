mod board;
mod screens;

use std::io;

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use bomber::{GameOutcome, GameView, Renderer, ScoreEntry, Status, StatusUi};

use crate::assets::Glyphs;

use screens::Hud;

/// Repaints with a red border after somebody dies.
const DEATH_FLASH_FRAMES: u8 = 3;

/// Raw-mode alternate screen, restored on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    pub fn restore_terminal(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Renderer and status UI drawing into the terminal.
///
/// Each collaborator call updates its part of the [`Hud`] and repaints the
/// whole screen; there is no frame loop of its own.
pub struct TerminalFrontend {
    tui: Tui,
    glyphs: Glyphs,
    hud: Hud,
    flash_frames: u8,
}

impl TerminalFrontend {
    pub fn new(glyphs: Glyphs) -> io::Result<Self> {
        let mut frontend = Self {
            tui: Tui::new()?,
            glyphs,
            hud: Hud::default(),
            flash_frames: 0,
        };
        frontend.hud.status = "Connecting...".to_string();
        frontend.repaint()?;
        Ok(frontend)
    }

    fn repaint(&mut self) -> io::Result<()> {
        self.hud.flash = self.flash_frames > 0;
        self.flash_frames = self.flash_frames.saturating_sub(1);

        let hud = &self.hud;
        self.tui.terminal.draw(|frame| screens::render(frame, hud))?;
        Ok(())
    }

    fn refresh(&mut self) {
        if let Err(e) = self.repaint() {
            log::warn!("Terminal repaint failed: {}", e);
        }
    }
}

impl Renderer for TerminalFrontend {
    fn draw_game(&mut self, view: &GameView<'_>) {
        self.hud.tick = view.tick();
        self.hud.board = board::render(view, &self.glyphs);
        self.hud.revivals = view
            .tombstones()
            .map(|sprite| {
                format!(
                    "{} in {}s",
                    sprite.tombstone.player_name, sprite.seconds_left
                )
            })
            .collect();
        self.refresh();
    }

    fn death_effect(&mut self) {
        self.flash_frames = DEATH_FLASH_FRAMES;
    }
}

impl StatusUi for TerminalFrontend {
    fn update_status(&mut self, status: Status) {
        match status {
            Status::Connected | Status::Disconnected => {
                self.hud.connected = status == Status::Connected;
                self.hud.status = status.message().to_string();
            }
            // The game-over dialog carries the message.
            Status::GameOver => {}
        }
        self.refresh();
    }

    fn update_scoreboard(&mut self, entries: &[ScoreEntry]) {
        self.hud.scoreboard = entries.to_vec();
        self.refresh();
    }

    fn show_game_over(&mut self, outcome: &GameOutcome) {
        self.hud.game_over = Some(outcome.message());
        self.refresh();
    }

    fn hide_game_over(&mut self) {
        if self.hud.game_over.take().is_some() {
            self.refresh();
        }
    }
}
