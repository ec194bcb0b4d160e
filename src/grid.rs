use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn square(count: u16) -> Self {
        Size {
            width: count,
            height: count,
        }
    }

    pub fn centre(&self) -> Pos {
        Pos {
            x: i32::from(self.width / 2),
            y: i32::from(self.height / 2),
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        (0..i32::from(self.width)).contains(&pos.x) && (0..i32::from(self.height)).contains(&pos.y)
    }
}

/// A grid cell. Every move produces a fresh `Pos`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosDelta {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn wrapped_add(&self, delta: PosDelta, size: Size) -> Pos {
        let new_x = (self.x + delta.x).rem_euclid(i32::from(size.width));
        let new_y = (self.y + delta.y).rem_euclid(i32::from(size.height));
        Pos { x: new_x, y: new_y }
    }
}

/// Heading of the snake. `Still` is the "not yet moving" zero vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PosDelta", try_from = "PosDelta")]
pub enum Direction {
    #[default]
    Still,
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Still => Direction::Still,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn is_still(&self) -> bool {
        *self == Direction::Still
    }
}

impl From<Direction> for PosDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Still => PosDelta { x: 0, y: 0 },
            Direction::North => PosDelta { x: 0, y: -1 },
            Direction::South => PosDelta { x: 0, y: 1 },
            Direction::East => PosDelta { x: 1, y: 0 },
            Direction::West => PosDelta { x: -1, y: 0 },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("({x}, {y}) is not a unit direction")]
pub struct NotADirection {
    pub x: i32,
    pub y: i32,
}

impl TryFrom<PosDelta> for Direction {
    type Error = NotADirection;

    fn try_from(delta: PosDelta) -> Result<Self, Self::Error> {
        match (delta.x, delta.y) {
            (0, 0) => Ok(Direction::Still),
            (0, -1) => Ok(Direction::North),
            (0, 1) => Ok(Direction::South),
            (1, 0) => Ok(Direction::East),
            (-1, 0) => Ok(Direction::West),
            (x, y) => Err(NotADirection { x, y }),
        }
    }
}
