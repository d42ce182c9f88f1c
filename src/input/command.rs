use crossterm::event::KeyCode;

use crate::game::TableSize;

/// Logical commands the shell can issue against the engine or itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    TogglePause,
    NewGame,
    Resize(TableSize),
    Save,
    Load,
    Quit,
}

pub fn map_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Left => Some(Command::MoveLeft),
        KeyCode::Right => Some(Command::MoveRight),
        KeyCode::Down => Some(Command::MoveDown),
        KeyCode::Up => Some(Command::Rotate),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::TogglePause),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::NewGame),
        KeyCode::Char('1') => Some(Command::Resize(TableSize::Small)),
        KeyCode::Char('2') => Some(Command::Resize(TableSize::Medium)),
        KeyCode::Char('3') => Some(Command::Resize(TableSize::Large)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Save),
        KeyCode::Char('l') | KeyCode::Char('L') => Some(Command::Load),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
