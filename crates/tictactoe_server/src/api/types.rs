//! Request and response bodies for the REST API.
//!
//! Each domain entity maps to its response through an explicit `From`.

use serde::{Deserialize, Serialize};
use tictactoe_core::{Board, Mark, Outcome, winning_line};

use crate::{Game, Player};

/// Body of `POST /api/games`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// Zero to two player names.
    #[serde(default)]
    pub players: Vec<String>,
}

/// Body of `PUT /api/games/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGameRequest {
    /// Proposed board, 9 symbols over `X`, `O`, `.`.
    pub state: String,
}

/// Body of `POST /api/outcome`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// Board to classify.
    pub state: String,
}

/// A player as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResponse {
    /// Player id.
    pub id: i32,
    /// Display name.
    pub name: String,
}

impl From<&Player> for PlayerResponse {
    fn from(player: &Player) -> Self {
        Self {
            id: *player.id(),
            name: player.name().clone(),
        }
    }
}

/// Outcome status tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Still being played.
    InProgress,
    /// Someone completed a line.
    Win,
    /// Full board, no line.
    Draw,
}

/// Classification of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeResponse {
    /// Status tag.
    pub status: OutcomeStatus,
    /// Winning mark, when `status` is `win`.
    pub winner: Option<Mark>,
    /// Squares of the winning line, when `status` is `win`.
    pub line: Option<[usize; 3]>,
}

impl OutcomeResponse {
    /// Builds the response for `board`, already classified as `outcome`.
    pub fn new(board: &Board, outcome: Outcome) -> Self {
        let status = match outcome {
            Outcome::InProgress => OutcomeStatus::InProgress,
            Outcome::Win(_) => OutcomeStatus::Win,
            Outcome::Draw => OutcomeStatus::Draw,
        };
        Self {
            status,
            winner: outcome.winner(),
            line: winning_line(board),
        }
    }
}

/// A game as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResponse {
    /// Game id.
    pub id: i32,
    /// Board in wire form.
    pub state: String,
    /// Player holding X.
    pub player_x: PlayerResponse,
    /// Player holding O.
    pub player_o: PlayerResponse,
    /// Mark due to move next.
    pub to_move: Mark,
    /// Current classification.
    pub outcome: OutcomeResponse,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            id: *game.id(),
            state: game.board().to_string(),
            player_x: game.player_x().into(),
            player_o: game.player_o().into(),
            to_move: game.to_move(),
            outcome: OutcomeResponse::new(game.board(), game.outcome()),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable code.
    pub code: String,
}
