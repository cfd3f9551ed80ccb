//! Keyboard thread: maps terminal key presses to session commands.

use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

use bomber::{Command, Direction};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Send(Command),
    Quit,
    Ignore,
}

pub fn map_key(key: &KeyEvent, name: &str) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    let command = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Command::Move(Direction::Right)
        }
        KeyCode::Char(' ') => Command::PlaceBomb,
        KeyCode::Enter => Command::Join(name.to_string()),
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Reset,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,
        _ => return KeyAction::Ignore,
    };
    KeyAction::Send(command)
}

/// Reads keys until quit or until the session stops listening.
///
/// Dropping the sender on exit is what tells the session to shut down.
pub fn spawn(commands: UnboundedSender<Command>, name: String) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !commands.is_closed() {
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    log::error!("Keyboard poll failed: {}", e);
                    break;
                }
            }

            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("Keyboard read failed: {}", e);
                    break;
                }
            };

            match map_key(&key, &name) {
                KeyAction::Send(command) => {
                    if commands.send(command).is_err() {
                        break;
                    }
                }
                KeyAction::Quit => {
                    log::info!("Quit requested");
                    break;
                }
                KeyAction::Ignore => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_move() {
        assert_eq!(
            map_key(&press(KeyCode::Up), "Ann"),
            KeyAction::Send(Command::Move(Direction::Up))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('a')), "Ann"),
            KeyAction::Send(Command::Move(Direction::Left))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('D')), "Ann"),
            KeyAction::Send(Command::Move(Direction::Right))
        );
    }

    #[test]
    fn action_keys() {
        assert_eq!(
            map_key(&press(KeyCode::Char(' ')), "Ann"),
            KeyAction::Send(Command::PlaceBomb)
        );
        assert_eq!(
            map_key(&press(KeyCode::Enter), "Ann"),
            KeyAction::Send(Command::Join("Ann".to_string()))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('r')), "Ann"),
            KeyAction::Send(Command::Reset)
        );
        assert_eq!(map_key(&press(KeyCode::Esc), "Ann"), KeyAction::Quit);
        assert_eq!(map_key(&press(KeyCode::F(1)), "Ann"), KeyAction::Ignore);
    }

    #[test]
    fn ctrl_c_quits_and_releases_are_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c, "Ann"), KeyAction::Quit);

        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(&release, "Ann"), KeyAction::Ignore);
    }
}
