use crossterm::event::KeyCode;

use crate::grid::Direction;

/// A keypress, reduced to what steering cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Other,
}

impl Key {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::North),
            Key::Down => Some(Direction::South),
            Key::Left => Some(Direction::West),
            Key::Right => Some(Direction::East),
            Key::Other => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Key::Up => "ArrowUp",
            Key::Down => "ArrowDown",
            Key::Left => "ArrowLeft",
            Key::Right => "ArrowRight",
            Key::Other => "",
        }
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Up | KeyCode::Char('w') => Key::Up,
            KeyCode::Down | KeyCode::Char('s') => Key::Down,
            KeyCode::Left | KeyCode::Char('a') => Key::Left,
            KeyCode::Right | KeyCode::Char('d') => Key::Right,
            _ => Key::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Steer {
    pub direction: Direction,
    pub accepted: bool,
}

/// Decides what a keypress does to the current heading.
///
/// Unknown keys are ignored, and a snake that is already moving may not
/// turn straight back on itself.
pub fn steer(key: Key, current: Direction) -> Steer {
    let rejected = Steer {
        direction: current,
        accepted: false,
    };

    match key.direction() {
        None => rejected,
        Some(proposed) if !current.is_still() && proposed == current.opposite() => rejected,
        Some(proposed) => Steer {
            direction: proposed,
            accepted: true,
        },
    }
}
