//! Reactive redraw and UI refresh.
//!
//! There is no frame loop: every state change the synchronizer reports is
//! turned into collaborator calls in the same call stack.

use bitflags::bitflags;

use crate::state::{GameOutcome, GameView, ScoreEntry};

bitflags! {
    /// What a processed event asks the frontend to do.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Triggers: u8 {
        const REDRAW = 1 << 0;
        const UI = 1 << 1;
        /// The alive count dropped since the last pass.
        const DEATH = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Connected,
    Disconnected,
    GameOver,
}

impl Status {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Connected => "Connected!",
            Self::Disconnected => "Disconnected. Attempting to reconnect...",
            Self::GameOver => "",
        }
    }
}

pub trait Renderer {
    fn draw_game(&mut self, view: &GameView<'_>);

    /// Hook for a one-shot effect when somebody dies.
    fn death_effect(&mut self) {}
}

pub trait StatusUi {
    fn update_status(&mut self, status: Status);
    fn update_scoreboard(&mut self, entries: &[ScoreEntry]);
    fn show_game_over(&mut self, outcome: &GameOutcome);
    fn hide_game_over(&mut self);
}

pub trait Frontend: Renderer + StatusUi {}

impl<T: Renderer + StatusUi + ?Sized> Frontend for T {}

pub fn dispatch<F: Frontend + ?Sized>(
    frontend: &mut F,
    triggers: Triggers,
    connected: bool,
    view: &GameView<'_>,
) {
    if triggers.contains(Triggers::DEATH) {
        frontend.death_effect();
    }
    if triggers.contains(Triggers::REDRAW) {
        frontend.draw_game(view);
    }
    if triggers.contains(Triggers::UI) {
        refresh_ui(frontend, connected, view);
    }
}

pub fn refresh_ui<U: StatusUi + ?Sized>(ui: &mut U, connected: bool, view: &GameView<'_>) {
    ui.update_status(if connected {
        Status::Connected
    } else {
        Status::Disconnected
    });

    if !view.is_present() {
        return;
    }

    ui.update_scoreboard(&view.scoreboard());

    match view.outcome() {
        Some(outcome) => {
            ui.update_status(Status::GameOver);
            ui.show_game_over(&outcome);
        }
        None => ui.hide_game_over(),
    }
}
