//! Tic-tac-toe game server library.
//!
//! # Architecture
//!
//! - **Database**: SQLite persistence for players and games (diesel)
//! - **Registry**: name resolution and random mark assignment
//! - **Service**: game operations with move validation
//! - **API**: REST endpoints over the service (axum)
//!
//! Board rules live in [`tictactoe_core`].
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_server::{GameRepository, GameService};
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::new("games.db".to_string())?;
//! repository.run_migrations()?;
//!
//! let service = GameService::new(repository, Some(7));
//! let game = service.create_game(&["Matt".to_string(), "Bob".to_string()])?;
//! let game = service.update_game_state(*game.id(), "X........")?;
//! println!("{}", game.board().render());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
mod config;
mod db;
mod error;
mod registry;
mod service;
mod shutdown;

// Crate-level exports - Errors
pub use error::{AssignmentError, GameError};

// Crate-level exports - Persistence
pub use db::{DbError, DbErrorKind, Game, GameRepository, MIGRATIONS, NewPlayer, Player};

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Player assignment
pub use registry::{
    Assignment, MAX_NAME_LEN, PLAYERS_PER_GAME, PlayerRegistry, assign_marks, resolve_names,
    validate_name,
};

// Crate-level exports - Service and routing
pub use api::router;
pub use service::GameService;
pub use shutdown::shutdown_on;
