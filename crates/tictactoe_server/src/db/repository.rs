//! Database repository for games and players.

use std::collections::HashMap;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tictactoe_core::{Board, evaluate, validate_transition};
use tracing::{debug, info, instrument, warn};

use crate::GameError;
use crate::db::{DbError, DbErrorKind, Game, NewPlayer, Player, schema};
use crate::db::models::{GameRow, NewGameRow};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for game and player records.
///
/// Holds only the database path; every operation opens its own connection,
/// so clones are cheap and can be moved onto blocking worker threads.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// The file is created on first connection if missing.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(
                DbErrorKind::Connection,
                "Database path must not be empty",
            ));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Path of the backing database.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection with foreign keys enforced.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
        ))?;
        Ok(conn)
    }

    /// Applies any pending schema migrations, returning how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            DbError::new(DbErrorKind::Migration, format!("Migrations failed: {}", e))
        })?;
        for version in &applied {
            info!(%version, "Applied migration");
        }
        Ok(applied.len())
    }

    // ─────────────────────────────────────────────────────────────
    //  Players
    // ─────────────────────────────────────────────────────────────

    /// Number of known players.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count_players(&self) -> Result<i64, DbError> {
        let mut conn = self.connection()?;
        let count = schema::players::table
            .count()
            .get_result::<i64>(&mut conn)?;
        debug!(count, "Players counted");
        Ok(count)
    }

    /// Returns the player with this exact name, creating it if absent.
    ///
    /// Insert-if-absent and the lookup share one IMMEDIATE transaction, so
    /// concurrent callers asking for the same new name get the same row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_or_create_player(&self, name: &str) -> Result<Player, DbError> {
        let mut conn = self.connection()?;

        let (player, inserted) = conn.immediate_transaction(|conn| {
            let inserted = diesel::insert_or_ignore_into(schema::players::table)
                .values(&NewPlayer::new(name.to_string()))
                .execute(conn)?;
            let player = schema::players::table
                .filter(schema::players::name.eq(name))
                .select(Player::as_select())
                .first::<Player>(conn)
                .optional()?;
            Ok::<_, DbError>((player, inserted))
        })?;

        let player = player.ok_or_else(|| {
            DbError::new(
                DbErrorKind::Query,
                format!("Player {:?} was rejected by the database", name),
            )
        })?;

        if inserted > 0 {
            info!(player_id = player.id(), name = %player.name(), "Player created");
        } else {
            debug!(player_id = player.id(), "Existing player found");
        }
        Ok(player)
    }

    /// Gets a player by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player(&self, id: i32) -> Result<Option<Player>, DbError> {
        let mut conn = self.connection()?;
        let player = schema::players::table
            .find(id)
            .select(Player::as_select())
            .first::<Player>(&mut conn)
            .optional()?;
        Ok(player)
    }

    /// Gets a player by exact name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player_by_name(&self, name: &str) -> Result<Option<Player>, DbError> {
        debug!(name = %name, "Looking up player by name");
        let mut conn = self.connection()?;

        let player = schema::players::table
            .filter(schema::players::name.eq(name))
            .select(Player::as_select())
            .first::<Player>(&mut conn)
            .optional()?;

        if let Some(ref p) = player {
            debug!(player_id = p.id(), "Player found");
        } else {
            debug!("Player not found");
        }

        Ok(player)
    }

    /// Lists all players in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_players(&self) -> Result<Vec<Player>, DbError> {
        let mut conn = self.connection()?;
        let players = schema::players::table
            .order(schema::players::id.asc())
            .select(Player::as_select())
            .load::<Player>(&mut conn)?;
        info!(count = players.len(), "Players loaded");
        Ok(players)
    }

    // ─────────────────────────────────────────────────────────────
    //  Games
    // ─────────────────────────────────────────────────────────────

    /// Inserts a new game with an empty board.
    ///
    /// The initial write is not validated: an empty board is the one state
    /// that has no predecessor.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the players are not distinct or a database
    /// error occurs.
    #[instrument(skip(self, player_x, player_o), fields(x = player_x.id(), o = player_o.id()))]
    pub fn insert_game(&self, player_x: &Player, player_o: &Player) -> Result<Game, DbError> {
        if player_x.id() == player_o.id() {
            return Err(DbError::new(
                DbErrorKind::Query,
                format!("Game needs two distinct players, got {} twice", player_x.id()),
            ));
        }

        let mut conn = self.connection()?;
        let new_game = NewGameRow::new(Board::new().to_string(), *player_x.id(), *player_o.id());

        let row = diesel::insert_into(schema::games::table)
            .values(&new_game)
            .returning(GameRow::as_returning())
            .get_result(&mut conn)?;

        let players = HashMap::from([
            (*player_x.id(), player_x.clone()),
            (*player_o.id(), player_o.clone()),
        ]);
        let game = row.into_game(&players)?;
        info!(game_id = game.id(), "Game created");
        Ok(game)
    }

    /// Gets a game by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: i32) -> Result<Option<Game>, DbError> {
        let mut conn = self.connection()?;
        let row = schema::games::table
            .find(id)
            .select(GameRow::as_select())
            .first::<GameRow>(&mut conn)
            .optional()?;

        match row {
            Some(row) => {
                let players = load_players(&mut conn, &[row.player_x_id, row.player_o_id])?;
                Ok(Some(row.into_game(&players)?))
            }
            None => {
                debug!(game_id = id, "Game not found");
                Ok(None)
            }
        }
    }

    /// Lists all games in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<Game>, DbError> {
        let mut conn = self.connection()?;
        let rows = schema::games::table
            .order(schema::games::id.asc())
            .select(GameRow::as_select())
            .load::<GameRow>(&mut conn)?;

        let ids: Vec<i32> = rows
            .iter()
            .flat_map(|r| [r.player_x_id, r.player_o_id])
            .collect();
        let players = load_players(&mut conn, &ids)?;

        let games = rows
            .into_iter()
            .map(|row| row.into_game(&players))
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = games.len(), "Games loaded");
        Ok(games)
    }

    /// Replaces a game's board after validating the move.
    ///
    /// Runs as one IMMEDIATE transaction: the write lock is taken before the
    /// current board is read, so concurrent updates to the same game are
    /// validated one after another against fresh state. Nothing is written
    /// unless every check passes.
    ///
    /// With `reject_after_game_over`, moves onto a won or drawn board fail
    /// with [`GameError::GameOver`].
    ///
    /// # Errors
    ///
    /// - [`GameError::NotFound`] if no game has this id
    /// - [`GameError::GameOver`] per the policy above
    /// - [`GameError::Transition`] if the move is illegal
    /// - [`GameError::Db`] on database failure
    #[instrument(skip(self, proposed), fields(proposed = %proposed))]
    pub fn update_game_state(
        &self,
        id: i32,
        proposed: &Board,
        reject_after_game_over: bool,
    ) -> Result<Game, GameError> {
        let mut conn = self.connection()?;

        let game = conn.immediate_transaction(|conn| {
            let row = schema::games::table
                .find(id)
                .select(GameRow::as_select())
                .first::<GameRow>(conn)
                .optional()?;
            let Some(row) = row else {
                warn!(game_id = id, "Update for unknown game");
                return Err(GameError::NotFound(id));
            };

            let current = row.board()?;
            let outcome = evaluate(&current);
            if reject_after_game_over && outcome.is_terminal() {
                warn!(game_id = id, ?outcome, "Update for finished game");
                return Err(GameError::GameOver(outcome));
            }

            let mov = validate_transition(&current, proposed)?;

            let row = diesel::update(schema::games::table.find(id))
                .set((
                    schema::games::state.eq(proposed.to_string()),
                    schema::games::updated_at.eq(diesel::dsl::now),
                ))
                .returning(GameRow::as_returning())
                .get_result::<GameRow>(conn)?;

            let players = load_players(conn, &[row.player_x_id, row.player_o_id])?;
            let game = row.into_game(&players)?;
            info!(game_id = id, %mov, outcome = ?game.outcome(), "Move applied");
            Ok(game)
        })?;

        Ok(game)
    }

    /// Deletes a game. Its players are kept.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if no game has this id, or
    /// [`GameError::Db`] on database failure.
    #[instrument(skip(self))]
    pub fn delete_game(&self, id: i32) -> Result<(), GameError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(schema::games::table.find(id)).execute(&mut conn)?;

        if deleted == 0 {
            warn!(game_id = id, "Delete for unknown game");
            return Err(GameError::NotFound(id));
        }
        info!(game_id = id, "Game deleted");
        Ok(())
    }
}

/// Loads the given players keyed by id.
fn load_players(conn: &mut SqliteConnection, ids: &[i32]) -> Result<HashMap<i32, Player>, DbError> {
    let players = schema::players::table
        .filter(schema::players::id.eq_any(ids.to_vec()))
        .select(Player::as_select())
        .load::<Player>(conn)?;
    Ok(players.into_iter().map(|p| (*p.id(), p)).collect())
}
