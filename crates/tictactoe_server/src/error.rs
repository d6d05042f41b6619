//! Service error types.

use tictactoe_core::{BoardParseError, Outcome, TransitionError};

use crate::db::DbError;

/// Failure resolving the players for a new game.
#[derive(Debug, Clone, derive_more::Display)]
pub enum AssignmentError {
    /// More than two names were supplied.
    #[display("A game takes at most 2 players, got {requested}")]
    TooManyPlayers {
        /// Number of names supplied.
        requested: usize,
    },

    /// A supplied name is empty or longer than 40 characters.
    #[display("Player name must be 1 to 40 characters, got {name:?}")]
    InvalidPlayerName {
        /// The rejected name.
        name: String,
    },

    /// Both slots resolved to the same name.
    #[display("Both players are named {name:?}")]
    DuplicatePlayerName {
        /// The repeated name.
        name: String,
    },

    /// Storage failed while resolving players.
    #[display("{_0}")]
    Db(DbError),
}

impl std::error::Error for AssignmentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Db(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbError> for AssignmentError {
    fn from(err: DbError) -> Self {
        Self::Db(err)
    }
}

/// Failure of a game operation.
#[derive(Debug, Clone, derive_more::Display)]
pub enum GameError {
    /// No game has this id.
    #[display("Game {_0} not found")]
    NotFound(i32),

    /// The proposed state is not a 9-symbol board string.
    #[display("Invalid board state: {_0}")]
    InvalidState(BoardParseError),

    /// The proposed state is not one legal move from the current one.
    #[display("Illegal move: {_0}")]
    Transition(TransitionError),

    /// The game is already decided and the server rejects further moves.
    #[display("Game is already over: {_0:?}")]
    GameOver(Outcome),

    /// Players could not be assigned.
    #[display("{_0}")]
    Assignment(AssignmentError),

    /// Storage failure.
    #[display("{_0}")]
    Db(DbError),
}

impl GameError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidState(_) => "invalid_state",
            Self::Transition(TransitionError::InvalidMoveCount { .. }) => "invalid_move_count",
            Self::Transition(TransitionError::CellOverwrite { .. }) => "cell_overwrite",
            Self::Transition(TransitionError::WrongTurn { .. }) => "wrong_turn",
            Self::GameOver(_) => "game_over",
            Self::Assignment(AssignmentError::TooManyPlayers { .. }) => "too_many_players",
            Self::Assignment(AssignmentError::InvalidPlayerName { .. }) => "invalid_player_name",
            Self::Assignment(AssignmentError::DuplicatePlayerName { .. }) => {
                "duplicate_player_name"
            }
            Self::Assignment(AssignmentError::Db(_)) | Self::Db(_) => "internal",
        }
    }

    /// True when the caller sent a bad request rather than the server failing.
    pub fn is_client_error(&self) -> bool {
        self.code() != "internal"
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidState(e) => Some(e),
            Self::Transition(e) => Some(e),
            Self::Assignment(e) => Some(e),
            Self::Db(e) => Some(e),
            Self::NotFound(_) | Self::GameOver(_) => None,
        }
    }
}

impl From<DbError> for GameError {
    fn from(err: DbError) -> Self {
        Self::Db(err)
    }
}

impl From<diesel::result::Error> for GameError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::Db(DbError::from(err))
    }
}

impl From<BoardParseError> for GameError {
    fn from(err: BoardParseError) -> Self {
        Self::InvalidState(err)
    }
}

impl From<TransitionError> for GameError {
    fn from(err: TransitionError) -> Self {
        Self::Transition(err)
    }
}

impl From<AssignmentError> for GameError {
    fn from(err: AssignmentError) -> Self {
        Self::Assignment(err)
    }
}
