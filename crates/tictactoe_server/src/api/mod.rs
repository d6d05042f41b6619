//! REST API over [`GameService`].
//!
//! Endpoints:
//! - `GET    /health`           - Health check
//! - `GET    /api/games`        - List games
//! - `POST   /api/games`        - Create a game for up to two players
//! - `GET    /api/games/{id}`   - Get one game
//! - `PUT    /api/games/{id}`   - Submit the next board state
//! - `DELETE /api/games/{id}`   - Delete a game
//! - `GET    /api/players`      - List players
//! - `POST   /api/outcome`      - Classify a board without storing it

mod error;
mod extract;
mod handlers;
mod types;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tracing::info;

use crate::service::GameService;

pub use error::ApiError;
pub use extract::{ApiJson, ApiPath};
pub use types::{
    CreateGameRequest, ErrorResponse, EvaluateRequest, GameResponse, HealthResponse,
    OutcomeResponse, OutcomeStatus, PlayerResponse, UpdateGameRequest,
};

/// Builds the application router.
pub fn router(service: Arc<GameService>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/games",
            get(handlers::list_games).post(handlers::create_game),
        )
        .route(
            "/api/games/{id}",
            get(handlers::get_game)
                .put(handlers::update_game)
                .delete(handlers::delete_game),
        )
        .route("/api/players", get(handlers::list_players))
        .route("/api/outcome", post(handlers::evaluate_outcome))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(service)
}
