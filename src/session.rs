use std::fmt;

use log::{debug, info, warn};

use crate::engine;
use crate::grid::{Direction, Pos, Size};
use crate::input::{self, Key};
use crate::remote::{BoardState, GameId, JoinResponse, NodeStatus};
use crate::snake::Snake;

/// Who computes the next state. Fixed for the life of a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Local,
    /// `game_id` stays empty until the authority has answered a join.
    Remote { game_id: Option<GameId> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Playing,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => f.write_str("idle"),
            Status::Playing => f.write_str("playing"),
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    size: Size,
    mode: Mode,
    snake: Snake,
    food: Option<Pos>,
    direction: Direction,
    started: bool,
    last_key: Option<Key>,
    workers: Vec<NodeStatus>,
    last_poll_seq: u64,
}

impl GameSession {
    pub fn new(size: Size, mode: Mode) -> Self {
        GameSession {
            size,
            mode,
            snake: Snake::new(size.centre()),
            food: None,
            direction: Direction::Still,
            started: false,
            last_key: None,
            workers: Vec::new(),
            last_poll_seq: 0,
        }
    }

    pub fn local(size: Size) -> Self {
        Self::new(size, Mode::Local)
    }

    pub fn remote(size: Size) -> Self {
        Self::new(size, Mode::Remote { game_id: None })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Pos> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn last_key(&self) -> Option<Key> {
        self.last_key
    }

    pub fn workers(&self) -> &[NodeStatus] {
        &self.workers
    }

    pub fn status(&self) -> Status {
        if self.started {
            Status::Playing
        } else {
            Status::Idle
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.mode, Mode::Remote { .. })
    }

    pub fn game_id(&self) -> Option<&GameId> {
        match &self.mode {
            Mode::Remote { game_id } => game_id.as_ref(),
            Mode::Local => None,
        }
    }

    /// The game to poll, if polling makes sense right now.
    pub fn poll_target(&self) -> Option<&GameId> {
        if self.started {
            self.game_id()
        } else {
            None
        }
    }

    /// Applies a keypress. Returns the new heading when the key was
    /// accepted, so the caller can pass it on to a remote authority.
    pub fn handle_key(&mut self, key: Key) -> Option<Direction> {
        let steer = input::steer(key, self.direction);
        if !steer.accepted {
            return None;
        }

        if !self.started {
            info!("First input received, game started");
        }
        self.direction = steer.direction;
        self.started = true;
        self.last_key = Some(key);
        Some(steer.direction)
    }

    /// One movement tick. Returns whether the snake moved.
    ///
    /// Only a started local session moves here; a remote one waits for its
    /// state polls.
    pub fn tick(&mut self) -> bool {
        if !self.started || self.is_remote() {
            return false;
        }

        let next = engine::advance(&self.snake, self.direction, self.size);
        let moved = next != self.snake;
        self.snake = next;
        moved
    }

    pub fn apply_join(&mut self, joined: JoinResponse) {
        let Mode::Remote { game_id } = &mut self.mode else {
            warn!("Ignoring join for {} in a local session", joined.game_id);
            return;
        };

        info!("Joined game {}", joined.game_id);
        *game_id = Some(joined.game_id);
        self.overwrite(joined.initial_state);
    }

    /// Replaces local state with a polled board. Polls that were overtaken by
    /// a later one, or that belong to another game, are dropped.
    pub fn apply_poll(&mut self, seq: u64, game_id: &GameId, state: BoardState) -> bool {
        if self.game_id() != Some(game_id) {
            debug!("Dropping poll #{} for foreign game {}", seq, game_id);
            return false;
        }
        if seq <= self.last_poll_seq {
            debug!(
                "Dropping stale poll #{} (already applied #{})",
                seq, self.last_poll_seq
            );
            return false;
        }

        self.last_poll_seq = seq;
        self.overwrite(state);
        true
    }

    pub fn last_poll_seq(&self) -> u64 {
        self.last_poll_seq
    }

    pub fn set_workers(&mut self, workers: Vec<NodeStatus>) {
        self.workers = workers;
    }

    fn overwrite(&mut self, state: BoardState) {
        if let Some(board_size) = state.board_size {
            if board_size != self.size.width || board_size != self.size.height {
                warn!(
                    "Authority board is {} cells wide but the local grid is {}x{}",
                    board_size, self.size.width, self.size.height
                );
            }
        }
        self.snake = state.snake;
        self.food = state.food;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Size {
        Size::square(20)
    }

    fn board(head: Pos, food: Pos) -> BoardState {
        BoardState {
            snake: Snake::new(head),
            food: Some(food),
            board_size: None,
        }
    }

    fn joined_remote() -> GameSession {
        let mut session = GameSession::remote(grid());
        session.apply_join(JoinResponse {
            game_id: GameId::new("g1"),
            initial_state: board(Pos { x: 5, y: 5 }, Pos { x: 7, y: 7 }),
        });
        session
    }

    #[test]
    fn test_initial_state() {
        let session = GameSession::local(grid());
        assert_eq!(session.snake(), &Snake::new(Pos { x: 10, y: 10 }));
        assert_eq!(session.direction(), Direction::Still);
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.food(), None);
        assert_eq!(session.last_key(), None);
    }

    #[test]
    fn test_no_movement_while_idle() {
        let mut session = GameSession::local(grid());
        assert!(!session.tick());
        assert_eq!(session.snake(), &Snake::new(Pos { x: 10, y: 10 }));
    }

    #[test]
    fn test_local_right_then_tick() {
        let mut session = GameSession::local(grid());
        assert_eq!(session.handle_key(Key::Right), Some(Direction::East));
        assert_eq!(session.status(), Status::Playing);
        assert_eq!(session.last_key(), Some(Key::Right));

        assert!(session.tick());
        assert_eq!(session.snake(), &Snake::new(Pos { x: 11, y: 10 }));
    }

    #[test]
    fn test_local_wraps_at_edge() {
        let mut session = GameSession::local(grid());
        session.handle_key(Key::Right);
        for _ in 0..9 {
            session.tick();
        }
        assert_eq!(session.snake().head(), Some(Pos { x: 19, y: 10 }));

        session.tick();
        assert_eq!(session.snake().head(), Some(Pos { x: 0, y: 10 }));
    }

    #[test]
    fn test_reversal_keeps_heading_and_key() {
        let mut session = GameSession::local(grid());
        session.handle_key(Key::Right);
        assert_eq!(session.handle_key(Key::Left), None);
        assert_eq!(session.direction(), Direction::East);
        assert_eq!(session.last_key(), Some(Key::Right));
    }

    #[test]
    fn test_other_key_does_not_start() {
        let mut session = GameSession::local(grid());
        assert_eq!(session.handle_key(Key::Other), None);
        assert_eq!(session.status(), Status::Idle);
    }

    #[test]
    fn test_join_seeds_state_without_simulation() {
        let session = joined_remote();
        assert_eq!(session.game_id(), Some(&GameId::new("g1")));
        assert_eq!(session.snake(), &Snake::new(Pos { x: 5, y: 5 }));
        assert_eq!(session.food(), Some(Pos { x: 7, y: 7 }));
        assert_eq!(session.status(), Status::Idle);
    }

    #[test]
    fn test_remote_tick_does_not_simulate() {
        let mut session = joined_remote();
        session.handle_key(Key::Down);
        assert!(!session.tick());
        assert_eq!(session.snake(), &Snake::new(Pos { x: 5, y: 5 }));
    }

    #[test]
    fn test_poll_overwrites_everything() {
        let mut session = joined_remote();
        session.handle_key(Key::Up);

        let polled = BoardState {
            snake: Snake::from(vec![Pos { x: 1, y: 1 }, Pos { x: 1, y: 2 }]),
            food: Some(Pos { x: 3, y: 3 }),
            board_size: Some(20),
        };
        assert!(session.apply_poll(1, &GameId::new("g1"), polled.clone()));
        assert_eq!(session.snake(), &polled.snake);
        assert_eq!(session.food(), polled.food);
    }

    #[test]
    fn test_stale_poll_discarded() {
        let mut session = joined_remote();
        let g1 = GameId::new("g1");

        assert!(session.apply_poll(2, &g1, board(Pos { x: 9, y: 9 }, Pos { x: 0, y: 0 })));
        assert!(!session.apply_poll(1, &g1, board(Pos { x: 8, y: 8 }, Pos { x: 0, y: 0 })));
        assert!(!session.apply_poll(2, &g1, board(Pos { x: 8, y: 8 }, Pos { x: 0, y: 0 })));
        assert_eq!(session.snake().head(), Some(Pos { x: 9, y: 9 }));
    }

    #[test]
    fn test_foreign_poll_discarded() {
        let mut session = joined_remote();
        assert!(!session.apply_poll(
            1,
            &GameId::new("other"),
            board(Pos { x: 1, y: 1 }, Pos { x: 2, y: 2 })
        ));
        assert_eq!(session.snake(), &Snake::new(Pos { x: 5, y: 5 }));
    }

    #[test]
    fn test_poll_target_needs_start_and_join() {
        let mut session = GameSession::remote(grid());
        session.handle_key(Key::Left);
        assert_eq!(session.poll_target(), None);

        let mut session = joined_remote();
        assert_eq!(session.poll_target(), None);
        session.handle_key(Key::Left);
        assert_eq!(session.poll_target(), Some(&GameId::new("g1")));

        let mut local = GameSession::local(grid());
        local.handle_key(Key::Left);
        assert_eq!(local.poll_target(), None);
    }

    #[test]
    fn test_join_ignored_in_local_mode() {
        let mut session = GameSession::local(grid());
        session.apply_join(JoinResponse {
            game_id: GameId::new("g1"),
            initial_state: board(Pos { x: 5, y: 5 }, Pos { x: 7, y: 7 }),
        });
        assert_eq!(session.mode(), &Mode::Local);
        assert_eq!(session.snake(), &Snake::new(Pos { x: 10, y: 10 }));
    }
}
