//! Tictactoe - game server CLI

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tictactoe_core::{Board, Outcome, evaluate};
use tictactoe_server::{GameRepository, GameService, ServerConfig, router, shutdown_on};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
            seed,
        } => {
            let config = ServerConfig::load_or_default(&config)?
                .with_overrides(host, port, db_path, seed);
            run_server(config).await
        }
        Command::Migrate { config, db_path } => {
            let config =
                ServerConfig::load_or_default(&config)?.with_overrides(None, None, db_path, None);
            run_migrate(&config)
        }
        Command::Evaluate { state } => run_evaluate(&state),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tictactoe_server=debug")),
        )
        .init();
}

fn open_repository(config: &ServerConfig) -> Result<GameRepository> {
    let repository = GameRepository::new(config.db_path().clone())?;
    let applied = repository
        .run_migrations()
        .with_context(|| format!("Migrating {}", config.db_path()))?;
    info!(applied, db_path = %config.db_path(), "Database ready");
    Ok(repository)
}

/// Run the HTTP game server
#[instrument(skip(config), fields(addr = %config.bind_address()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!("Starting tictactoe server");

    let repository = open_repository(&config)?;
    let service = Arc::new(GameService::from_config(repository, &config));
    let app = router(service);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Apply migrations without serving
fn run_migrate(config: &ServerConfig) -> Result<()> {
    open_repository(config)?;
    Ok(())
}

/// Print a board and its classification
fn run_evaluate(state: &str) -> Result<()> {
    let board: Board = state
        .parse()
        .with_context(|| format!("Invalid board {:?}", state))?;

    println!("{}", board.render());
    match evaluate(&board) {
        Outcome::InProgress => println!("In progress, {} to move", board.to_move()),
        Outcome::Win(mark) => println!("{} wins", mark),
        Outcome::Draw => println!("Draw"),
    }
    Ok(())
}
