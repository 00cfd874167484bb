use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, SessionInput};

/// Semantic classification of a key press, interpreted per app state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Direction(Direction),
    PauseToggle,
    Escape,
    Confirm,
    Backspace,
    Char(char),
    Quit,
    None,
}

impl KeyAction {
    /// Interpretation for a running game session. WASD doubles as
    /// arrows and `p` as a pause toggle only here; in text-entry states
    /// those characters are literal input.
    pub fn to_session_input(self) -> Option<SessionInput> {
        match self {
            KeyAction::Direction(dir) => Some(SessionInput::Direction(dir)),
            KeyAction::PauseToggle => Some(SessionInput::PauseToggle),
            KeyAction::Escape => Some(SessionInput::Escape),
            KeyAction::Quit => Some(SessionInput::Quit),
            KeyAction::Char(c) => match c.to_ascii_lowercase() {
                'w' => Some(SessionInput::Direction(Direction::North)),
                's' => Some(SessionInput::Direction(Direction::South)),
                'a' => Some(SessionInput::Direction(Direction::West)),
                'd' => Some(SessionInput::Direction(Direction::East)),
                'p' => Some(SessionInput::PauseToggle),
                _ => None,
            },
            _ => None,
        }
    }
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up => KeyAction::Direction(Direction::North),
            KeyCode::Down => KeyAction::Direction(Direction::South),
            KeyCode::Left => KeyAction::Direction(Direction::West),
            KeyCode::Right => KeyAction::Direction(Direction::East),

            KeyCode::Tab => KeyAction::PauseToggle,
            KeyCode::Esc => KeyAction::Escape,
            KeyCode::Enter => KeyAction::Confirm,
            KeyCode::Backspace => KeyAction::Backspace,

            KeyCode::Char(c) => KeyAction::Char(c),

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
