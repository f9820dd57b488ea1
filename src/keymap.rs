use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::games::GameVariant;
use crate::session::{InputEvent, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Input(InputEvent),
    Quit,
}

/// Translate a key press into a command for the current screen
pub fn map_key(key: KeyEvent, state: SessionState, rules_open: bool) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let input = match state {
        SessionState::Menu => match key.code {
            KeyCode::Up | KeyCode::Char('k') => InputEvent::Previous,
            KeyCode::Down | KeyCode::Char('j') => InputEvent::Next,
            KeyCode::Enter => InputEvent::Confirm,
            KeyCode::Char(c @ '1'..='3') => InputEvent::KeySelect(digit_index(c)),
            KeyCode::Char('s') => InputEvent::ToggleMute,
            KeyCode::Esc | KeyCode::Char('q') => return Some(Command::Quit),
            _ => return None,
        },
        SessionState::Rules(_) => match key.code {
            KeyCode::Enter => InputEvent::Confirm,
            KeyCode::Esc => InputEvent::Cancel,
            KeyCode::Char('s') => InputEvent::ToggleMute,
            _ => return None,
        },
        SessionState::Playing(_) if rules_open => match key.code {
            KeyCode::Enter | KeyCode::Char('?') => InputEvent::Confirm,
            KeyCode::Esc => InputEvent::Cancel,
            _ => return None,
        },
        SessionState::Playing(variant) => match key.code {
            KeyCode::Char('?') | KeyCode::F(1) => InputEvent::ShowRules,
            KeyCode::Char('s') => InputEvent::ToggleMute,
            KeyCode::Esc => InputEvent::Cancel,
            code => return game_key(variant, code).map(Command::Input),
        },
        SessionState::GameOver { .. } => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => InputEvent::Confirm,
            KeyCode::Esc | KeyCode::Char('m') => InputEvent::Cancel,
            KeyCode::Char('s') => InputEvent::ToggleMute,
            KeyCode::Char('q') => return Some(Command::Quit),
            _ => return None,
        },
    };
    Some(Command::Input(input))
}

fn game_key(variant: GameVariant, code: KeyCode) -> Option<InputEvent> {
    match (variant, code) {
        (GameVariant::Choice, KeyCode::Left) => Some(InputEvent::KeySelect(0)),
        (GameVariant::Choice, KeyCode::Right) => Some(InputEvent::KeySelect(1)),
        (GameVariant::ShapeMatch, KeyCode::Char(c @ '1'..='9')) => {
            Some(InputEvent::KeySelect(digit_index(c)))
        }
        (GameVariant::MemoryRecall, KeyCode::Char(c)) => memory_cell_key(c).map(InputEvent::KeySelect),
        (GameVariant::MemoryRecall, KeyCode::Enter) => Some(InputEvent::Submit),
        _ => None,
    }
}

/// Keys 1-9, 0, - and = address the twelve memory cells in row-major order
fn memory_cell_key(c: char) -> Option<usize> {
    match c {
        '1'..='9' => Some(digit_index(c)),
        '0' => Some(9),
        '-' => Some(10),
        '=' => Some(11),
        _ => None,
    }
}

fn digit_index(c: char) -> usize {
    c.to_digit(10).map_or(0, |d| d as usize - 1)
}
