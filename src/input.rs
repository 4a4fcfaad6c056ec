//! Keyboard and button-bar mapping. Both sources produce the same commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Intent),
    Start,
    TogglePause,
    Quit,
}

/// Map a key press to a command. Unrecognized keys map to `None`.
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Left => Some(Command::Play(Intent::MoveLeft)),
        KeyCode::Right => Some(Command::Play(Intent::MoveRight)),
        KeyCode::Down => Some(Command::Play(Intent::SoftDrop)),
        KeyCode::Up => Some(Command::Play(Intent::Rotate)),
        KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Start),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
            Some(Command::TogglePause)
        }
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

// ============================================================================
// Button Bar
// ============================================================================

pub const BUTTONS: [(&str, Command); 6] = [
    ("Left", Command::Play(Intent::MoveLeft)),
    ("Right", Command::Play(Intent::MoveRight)),
    ("Down", Command::Play(Intent::SoftDrop)),
    ("Rotate", Command::Play(Intent::Rotate)),
    ("Start", Command::Start),
    ("Pause", Command::TogglePause),
];

const BUTTON_GAP: u16 = 1;

/// On-screen buttons laid out left to right as `[Label]`, one column apart.
pub struct ButtonBar;

impl ButtonBar {
    fn button_width(label: &str) -> u16 {
        label.chars().count() as u16 + 2
    }

    pub fn width() -> u16 {
        let buttons: u16 = BUTTONS.iter().map(|(label, _)| Self::button_width(label)).sum();
        buttons + BUTTON_GAP * (BUTTONS.len() as u16 - 1)
    }

    /// `(start column, label)` of each button relative to the bar's left edge.
    pub fn slots() -> Vec<(u16, &'static str)> {
        let mut x = 0;
        BUTTONS
            .iter()
            .map(|(label, _)| {
                let slot = (x, *label);
                x += Self::button_width(label) + BUTTON_GAP;
                slot
            })
            .collect()
    }

    /// Command under column `offset`, measured from the bar's left edge.
    pub fn hit(offset: u16) -> Option<Command> {
        let mut x = 0;
        for (label, command) in BUTTONS {
            let width = Self::button_width(label);
            if (x..x + width).contains(&offset) {
                return Some(command);
            }
            x += width + BUTTON_GAP;
        }
        None
    }
}
