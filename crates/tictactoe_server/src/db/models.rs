//! Database models and domain types.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tictactoe_core::{Board, Mark, Outcome, evaluate};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Player profile. Shared across games and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Player {
    id: i32,
    name: String,
    created_at: NaiveDateTime,
}

impl Player {
    #[cfg(test)]
    pub(crate) fn for_tests(id: i32, name: &str, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            name: name.to_string(),
            created_at,
        }
    }
}

/// Insertable player model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    name: String,
}

/// Raw `games` row; the board is still in wire form.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct GameRow {
    pub(crate) id: i32,
    pub(crate) state: String,
    pub(crate) player_x_id: i32,
    pub(crate) player_o_id: i32,
    pub(crate) created_at: NaiveDateTime,
    pub(crate) updated_at: NaiveDateTime,
}

impl GameRow {
    /// Parses the stored board.
    pub(crate) fn board(&self) -> Result<Board, DbError> {
        self.state.parse().map_err(|e| {
            DbError::corrupt(format!(
                "Game {} has unreadable state {:?}: {}",
                self.id, self.state, e
            ))
        })
    }

    /// Builds the domain game from this row and a player lookup table.
    #[instrument(skip(self, players), fields(game_id = self.id))]
    pub(crate) fn into_game(self, players: &HashMap<i32, Player>) -> Result<Game, DbError> {
        let board = self.board()?;
        let player = |id: i32| {
            players.get(&id).cloned().ok_or_else(|| {
                DbError::corrupt(format!("Game {} references missing player {}", self.id, id))
            })
        };
        let player_x = player(self.player_x_id)?;
        let player_o = player(self.player_o_id)?;

        Ok(Game::new(
            self.id,
            board,
            player_x,
            player_o,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Insertable game model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub(crate) struct NewGameRow {
    state: String,
    player_x_id: i32,
    player_o_id: i32,
}

/// A game with its board and both players resolved.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct Game {
    id: i32,
    board: Board,
    player_x: Player,
    player_o: Player,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Game {
    /// Classifies the current board.
    pub fn outcome(&self) -> Outcome {
        evaluate(&self.board)
    }

    /// Mark due to move next.
    pub fn to_move(&self) -> Mark {
        self.board.to_move()
    }

    /// The player holding `mark`.
    pub fn player_for(&self, mark: Mark) -> &Player {
        match mark {
            Mark::X => &self.player_x,
            Mark::O => &self.player_o,
        }
    }
}
