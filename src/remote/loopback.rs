use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::info;
use rand::Rng;

use super::{Authority, BoardState, GameId, JoinResponse, MoveRequest, NodeStatus, SyncError};
use crate::engine;
use crate::grid::{Direction, Pos, Size};
use crate::snake::Snake;

const INITIAL_LENGTH: usize = 3;

#[derive(Debug)]
struct LoopbackGame {
    snake: Snake,
    food: Pos,
    heading: Direction,
}

impl LoopbackGame {
    fn board(&self, size: Size) -> BoardState {
        BoardState {
            snake: self.snake.clone(),
            food: Some(self.food),
            board_size: Some(size.width),
        }
    }
}

/// An authority that lives in this process.
///
/// It behaves like the coordinator: a fresh game starts as a short snake in
/// the middle heading east, and the server keeps its own heading. Every
/// state fetch moves the snake one step.
#[derive(Debug)]
pub struct LoopbackAuthority {
    size: Size,
    games: Mutex<HashMap<GameId, LoopbackGame>>,
}

impl LoopbackAuthority {
    pub fn new(size: Size) -> Self {
        LoopbackAuthority {
            size,
            games: Mutex::new(HashMap::new()),
        }
    }

    fn games(&self) -> MutexGuard<'_, HashMap<GameId, LoopbackGame>> {
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn new_game_id(rng: &mut impl Rng) -> GameId {
    GameId::new(format!("{:032x}", rng.gen::<u128>()))
}

pub(crate) fn random_food(snake: &Snake, size: Size, rng: &mut impl Rng) -> Pos {
    loop {
        let pos = Pos {
            x: rng.gen_range(0..i32::from(size.width)),
            y: rng.gen_range(0..i32::from(size.height)),
        };

        if !snake.contains(pos) {
            return pos;
        }
    }
}

impl Authority for LoopbackAuthority {
    fn join(&self) -> Result<JoinResponse, SyncError> {
        let mut rng = rand::thread_rng();
        let game_id = new_game_id(&mut rng);
        let snake = Snake::straight(self.size.centre(), Direction::East, INITIAL_LENGTH, self.size);
        let food = random_food(&snake, self.size, &mut rng);
        let game = LoopbackGame {
            snake,
            food,
            heading: Direction::East,
        };

        let initial_state = game.board(self.size);
        self.games().insert(game_id.clone(), game);
        info!("Loopback game created with id {}", game_id);

        Ok(JoinResponse {
            game_id,
            initial_state,
        })
    }

    fn send_move(&self, request: &MoveRequest) -> Result<(), SyncError> {
        let mut games = self.games();
        let game = games
            .get_mut(&request.game_id)
            .ok_or_else(|| SyncError::UnknownGame(request.game_id.clone()))?;

        if !request.direction.is_still() && request.direction != game.heading.opposite() {
            game.heading = request.direction;
        }
        Ok(())
    }

    fn fetch_state(&self, game_id: &GameId) -> Result<BoardState, SyncError> {
        let mut games = self.games();
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| SyncError::UnknownGame(game_id.clone()))?;

        game.snake = engine::advance(&game.snake, game.heading, self.size);
        Ok(game.board(self.size))
    }

    fn fetch_workers(&self) -> Result<Vec<NodeStatus>, SyncError> {
        Ok(vec![NodeStatus {
            name: "loopback".to_owned(),
            ip: "127.0.0.1".to_owned(),
            ..NodeStatus::default()
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn authority() -> LoopbackAuthority {
        LoopbackAuthority::new(Size::square(20))
    }

    #[test]
    fn test_join_starts_in_the_middle() {
        let joined = authority().join().unwrap();
        let state = joined.initial_state;

        assert_eq!(joined.game_id.as_str().len(), 32);
        assert_eq!(state.snake.len(), INITIAL_LENGTH);
        assert_eq!(state.snake.head(), Some(Pos { x: 10, y: 10 }));
        let food = state.food.unwrap();
        assert!(!state.snake.contains(food));
        assert!(Size::square(20).contains(food));
    }

    #[test]
    fn test_games_are_distinct() {
        let authority = authority();
        let first = authority.join().unwrap();
        let second = authority.join().unwrap();
        assert_ne!(first.game_id, second.game_id);
    }

    #[test]
    fn test_fetch_advances_along_heading() {
        let authority = authority();
        let game_id = authority.join().unwrap().game_id;

        let state = authority.fetch_state(&game_id).unwrap();
        assert_eq!(state.snake.head(), Some(Pos { x: 11, y: 10 }));
        assert_eq!(state.snake.len(), INITIAL_LENGTH);
    }

    #[test]
    fn test_move_turns_but_never_reverses() {
        let authority = authority();
        let game_id = authority.join().unwrap().game_id;

        let reverse = MoveRequest {
            game_id: game_id.clone(),
            direction: Direction::West,
        };
        authority.send_move(&reverse).unwrap();
        let state = authority.fetch_state(&game_id).unwrap();
        assert_eq!(state.snake.head(), Some(Pos { x: 11, y: 10 }));

        let turn = MoveRequest {
            game_id: game_id.clone(),
            direction: Direction::South,
        };
        authority.send_move(&turn).unwrap();
        let state = authority.fetch_state(&game_id).unwrap();
        assert_eq!(state.snake.head(), Some(Pos { x: 11, y: 11 }));
    }

    #[test]
    fn test_unknown_game() {
        let result = authority().fetch_state(&GameId::new("missing"));
        assert!(matches!(result, Err(SyncError::UnknownGame(id)) if id.as_str() == "missing"));
    }

    #[test]
    fn test_random_food_avoids_snake() {
        let size = Size::square(4);
        // Everything but one cell is snake
        let mut cells = Vec::new();
        for y in 0..4 {
            for x in 0..4 {
                if (x, y) != (2, 3) {
                    cells.push(Pos { x, y });
                }
            }
        }
        let snake = Snake::from(cells);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_food(&snake, size, &mut rng), Pos { x: 2, y: 3 });
    }

    #[test]
    fn test_reports_one_worker() {
        let workers = authority().fetch_workers().unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].name, "loopback");
    }
}
