//! Locally authoritative simulation.

use crate::grid::{Direction, Size};
use crate::snake::Snake;

/// Computes the snake one tick later.
///
/// A `Still` direction leaves the snake where it is. Otherwise the head steps
/// one cell, wrapping at the edges, and the tail follows.
pub fn advance(snake: &Snake, direction: Direction, size: Size) -> Snake {
    let mut next = snake.clone();
    if !direction.is_still() {
        next.slither(direction, size);
    }
    next
}
