use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::{Direction, Pos, Size};

/// Body of the snake, head first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snake {
    body: VecDeque<Pos>,
}

impl Snake {
    pub fn new(head: Pos) -> Self {
        Snake {
            body: VecDeque::from([head]),
        }
    }

    /// A straight snake of `length` segments ending at `head`, trailing
    /// away from `direction`.
    pub fn straight(head: Pos, direction: Direction, length: usize, size: Size) -> Self {
        let back = direction.opposite().into();
        let mut body = VecDeque::with_capacity(length);
        let mut pos = head;
        for _ in 0..length {
            body.push_back(pos);
            pos = pos.wrapped_add(back, size);
        }
        Snake { body }
    }

    pub fn head(&self) -> Option<Pos> {
        self.body.front().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pos> {
        self.body.iter()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.body.contains(&pos)
    }

    /// Moves one cell: new head in front, tail dropped. Length is unchanged.
    pub(crate) fn slither(&mut self, direction: Direction, size: Size) {
        let Some(head) = self.head() else {
            return;
        };
        self.body.push_front(head.wrapped_add(direction.into(), size));
        self.body.pop_back();
    }
}

impl From<Vec<Pos>> for Snake {
    fn from(segments: Vec<Pos>) -> Self {
        Snake {
            body: segments.into(),
        }
    }
}
