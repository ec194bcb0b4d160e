use ratatui::{
    prelude::*,
    widgets::{Clear, List, ListItem},
};

use crate::grid::{Pos, Size};
use crate::remote::NodeStatus;
use crate::session::GameSession;
use crate::snake::Snake;

/// Terminal columns per grid cell, so cells come out roughly square.
pub const CELL_WIDTH: u16 = 2;

const GRID_SYMBOL: &str = "·";
const FOOD_SYMBOLS: [&str; 2] = ["▐", "▌"];

/// Paints the playing field. Reads state, never changes it.
#[derive(Clone, Copy, Debug)]
pub struct Board<'a> {
    snake: &'a Snake,
    food: Option<Pos>,
    size: Size,
}

impl<'a> Board<'a> {
    pub fn new(snake: &'a Snake, food: Option<Pos>, size: Size) -> Self {
        Board { snake, food, size }
    }

    pub fn of(session: &'a GameSession) -> Self {
        Self::new(session.snake(), session.food(), session.size())
    }

    pub fn footprint(size: Size) -> (u16, u16) {
        (size.width * CELL_WIDTH, size.height)
    }

    /// Top-left terminal cell for `pos`, if it fits inside `area`.
    fn origin(&self, pos: Pos, area: Rect) -> Option<(u16, u16)> {
        if !self.size.contains(pos) {
            return None;
        }
        let x = area.x + u16::try_from(pos.x).ok()? * CELL_WIDTH;
        let y = area.y + u16::try_from(pos.y).ok()?;
        (x + CELL_WIDTH <= area.right() && y < area.bottom()).then_some((x, y))
    }

    fn fill(&self, pos: Pos, colour: Color, area: Rect, buf: &mut Buffer) {
        if let Some((x, y)) = self.origin(pos, area) {
            for dx in 0..CELL_WIDTH {
                buf[(x + dx, y)].set_symbol(" ").set_bg(colour);
            }
        }
    }
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        for y in 0..self.size.height {
            for x in 0..self.size.width {
                let pos = Pos {
                    x: i32::from(x),
                    y: i32::from(y),
                };
                if let Some(cell) = self.origin(pos, area) {
                    buf[cell].set_symbol(GRID_SYMBOL).set_fg(Color::DarkGray);
                }
            }
        }

        for pos in self.snake.iter().skip(1) {
            self.fill(*pos, Color::Green, area, buf);
        }

        // Head last so it stays visible when the body overlaps it
        if let Some(head) = self.snake.head() {
            self.fill(head, Color::Yellow, area, buf);
        }

        if let Some(food) = self.food {
            if let Some((x, y)) = self.origin(food, area) {
                for (dx, symbol) in (0..).zip(FOOD_SYMBOLS) {
                    buf[(x + dx, y)].set_symbol(symbol).set_fg(Color::LightRed);
                }
            }
        }
    }
}

pub struct Workers<'a>(pub &'a [NodeStatus]);

impl Widget for Workers<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = if self.0.is_empty() {
            vec![ListItem::new("no workers reporting").dark_gray()]
        } else {
            self.0
                .iter()
                .map(|node| {
                    ListItem::new(vec![
                        Line::from(node.name.as_str().bold()),
                        Line::from(format!(
                            "  cpu {:>5.1}%  ram {:>5.1}%  net {:.2} MB/s",
                            node.cpu, node.ram, node.net
                        )),
                        Line::from(format!("  {}", node.ip)).dark_gray(),
                    ])
                })
                .collect()
        };
        Widget::render(List::new(items), area, buf);
    }
}
