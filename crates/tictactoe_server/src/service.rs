//! Game management business logic layer.

use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tictactoe_core::{Board, Mark, Outcome, evaluate};
use tracing::{debug, info, instrument};

use crate::config::ServerConfig;
use crate::db::{GameRepository, Player};
use crate::registry::{PlayerRegistry, assign_marks};
use crate::{Game, GameError};

/// Service layer for game operations.
///
/// Wraps [`GameRepository`] with player assignment on create, board
/// parsing on update, and the finished-game policy.
#[derive(Debug)]
pub struct GameService {
    repository: GameRepository,
    registry: PlayerRegistry,
    rng: Mutex<StdRng>,
    reject_moves_after_game_over: bool,
}

impl GameService {
    /// Creates a service over `repository`.
    ///
    /// With `seed`, mark assignment is reproducible; otherwise the RNG is
    /// seeded from the OS.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository, seed: Option<u64>) -> Self {
        info!("Creating GameService");
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            registry: PlayerRegistry::new(repository.clone()),
            repository,
            rng: Mutex::new(rng),
            reject_moves_after_game_over: false,
        }
    }

    /// Creates a service configured from `config`.
    pub fn from_config(repository: GameRepository, config: &ServerConfig) -> Self {
        Self::new(repository, *config.seed())
            .with_game_over_policy(*config.reject_moves_after_game_over())
    }

    /// Sets whether moves on won or drawn games are refused.
    pub fn with_game_over_policy(mut self, reject_moves_after_game_over: bool) -> Self {
        self.reject_moves_after_game_over = reject_moves_after_game_over;
        self
    }

    /// Creates a game for up to two named players.
    ///
    /// Missing names are synthesized, unknown names become new players and
    /// the marks are assigned at random.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Assignment`] for bad player lists and
    /// [`GameError::Db`] for storage failures.
    #[instrument(skip(self))]
    pub fn create_game(&self, player_names: &[String]) -> Result<Game, GameError> {
        debug!(count = player_names.len(), "Creating game");

        let (first, second) = self.registry.resolve_players(player_names)?;

        // Storage round-trips stay outside the lock.
        let assignment = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            assign_marks(first, second, &mut *rng)
        };
        let (x, o) = assignment.into_pair();

        let game = self.repository.insert_game(&x, &o)?;
        info!(
            game_id = game.id(),
            x = %game.player_for(Mark::X).name(),
            o = %game.player_for(Mark::O).name(),
            "Game ready"
        );
        Ok(game)
    }

    /// Gets a game by id.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if absent.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: i32) -> Result<Game, GameError> {
        self.repository.get_game(id)?.ok_or(GameError::NotFound(id))
    }

    /// Lists all games in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Db`] on storage failure.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<Game>, GameError> {
        Ok(self.repository.list_games()?)
    }

    /// Replaces a game's board with `state` (9-symbol wire string).
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidState`] if `state` does not parse
    /// - [`GameError::NotFound`] if the game is absent
    /// - [`GameError::GameOver`] if the game is decided and the policy
    ///   refuses further moves
    /// - [`GameError::Transition`] if the move is illegal
    #[instrument(skip(self))]
    pub fn update_game_state(&self, id: i32, state: &str) -> Result<Game, GameError> {
        let proposed: Board = state.parse()?;
        self.repository
            .update_game_state(id, &proposed, self.reject_moves_after_game_over)
    }

    /// Deletes a game. Players are kept.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if absent.
    #[instrument(skip(self))]
    pub fn delete_game(&self, id: i32) -> Result<(), GameError> {
        self.repository.delete_game(id)
    }

    /// Classifies a board given as a wire string.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if `state` does not parse.
    #[instrument(skip(self))]
    pub fn evaluate_outcome(&self, state: &str) -> Result<Outcome, GameError> {
        let (_, outcome) = self.evaluate_board(state)?;
        Ok(outcome)
    }

    /// Like [`evaluate_outcome`](Self::evaluate_outcome), also returning the
    /// parsed board so callers can inspect the winning line.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if `state` does not parse.
    pub fn evaluate_board(&self, state: &str) -> Result<(Board, Outcome), GameError> {
        let board: Board = state.parse()?;
        let outcome = evaluate(&board);
        debug!(%board, ?outcome, "Board evaluated");
        Ok((board, outcome))
    }

    /// Lists all known players in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Db`] on storage failure.
    #[instrument(skip(self))]
    pub fn list_players(&self) -> Result<Vec<Player>, GameError> {
        Ok(self.repository.list_players()?)
    }
}
