use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{Direction, Pos};
use crate::snake::Snake;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        GameId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical board as the authority sees it. Extra fields the coordinator
/// sends along (score, game over, heading) are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub snake: Snake,
    #[serde(default)]
    pub food: Option<Pos>,
    #[serde(rename = "boardSize", default, skip_serializing_if = "Option::is_none")]
    pub board_size: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub game_id: GameId,
    pub initial_state: BoardState,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub game_id: GameId,
    pub direction: Direction,
}

/// Load report from one worker node. Display only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStatus {
    pub name: String,
    pub cpu: f64,
    pub ram: f64,
    pub net: f64,
    pub ip: String,
}
