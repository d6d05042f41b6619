//! Command-line interface for the tictactoe server.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tic-tac-toe game server with a REST API
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Two-player tic-tac-toe over HTTP, backed by SQLite", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to the TOML config file (defaults apply if missing)
        #[arg(short, long, default_value = "tictactoe.toml")]
        config: PathBuf,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long, env = "DATABASE_URL")]
        db_path: Option<String>,

        /// Seed for reproducible mark assignment
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Apply pending database migrations and exit
    Migrate {
        /// Path to the TOML config file
        #[arg(short, long, default_value = "tictactoe.toml")]
        config: PathBuf,

        /// Path to the database file
        #[arg(long, env = "DATABASE_URL")]
        db_path: Option<String>,
    },

    /// Classify a board given as 9 symbols over X, O and '.'
    Evaluate {
        /// Board state, e.g. "XXXOO...."
        state: String,
    },
}
