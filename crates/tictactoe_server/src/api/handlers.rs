//! Route handlers.
//!
//! Storage is synchronous, so every service call runs on the blocking pool.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, instrument};

use crate::GameError;
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::types::{
    CreateGameRequest, EvaluateRequest, GameResponse, HealthResponse, OutcomeResponse,
    PlayerResponse, UpdateGameRequest,
};
use crate::service::GameService;

type ApiResult<T> = Result<T, ApiError>;

async fn run_blocking<T, F>(service: Arc<GameService>, f: F) -> ApiResult<T>
where
    F: FnOnce(&GameService) -> Result<T, GameError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| ApiError::internal(format!("Worker task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/games`
#[instrument(skip(service))]
pub async fn list_games(State(service): State<Arc<GameService>>) -> ApiResult<Json<Vec<GameResponse>>> {
    let games = run_blocking(service, |s| s.list_games()).await?;
    debug!(count = games.len(), "Listed games");
    Ok(Json(games.iter().map(GameResponse::from).collect()))
}

/// `POST /api/games`
///
/// The body is optional; without it both players are synthesized.
#[instrument(skip(service, body))]
pub async fn create_game(
    State(service): State<Arc<GameService>>,
    body: Option<ApiJson<CreateGameRequest>>,
) -> ApiResult<(StatusCode, Json<GameResponse>)> {
    let request = body.map(|ApiJson(request)| request).unwrap_or_default();
    let game = run_blocking(service, move |s| s.create_game(&request.players)).await?;
    Ok((StatusCode::CREATED, Json(GameResponse::from(&game))))
}

/// `GET /api/games/{id}`
#[instrument(skip(service))]
pub async fn get_game(
    State(service): State<Arc<GameService>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<GameResponse>> {
    let game = run_blocking(service, move |s| s.get_game(id)).await?;
    Ok(Json(GameResponse::from(&game)))
}

/// `PUT /api/games/{id}`
#[instrument(skip(service, request), fields(state = %request.state))]
pub async fn update_game(
    State(service): State<Arc<GameService>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(request): ApiJson<UpdateGameRequest>,
) -> ApiResult<Json<GameResponse>> {
    let game = run_blocking(service, move |s| s.update_game_state(id, &request.state)).await?;
    Ok(Json(GameResponse::from(&game)))
}

/// `DELETE /api/games/{id}`
#[instrument(skip(service))]
pub async fn delete_game(
    State(service): State<Arc<GameService>>,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    run_blocking(service, move |s| s.delete_game(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/players`
#[instrument(skip(service))]
pub async fn list_players(
    State(service): State<Arc<GameService>>,
) -> ApiResult<Json<Vec<PlayerResponse>>> {
    let players = run_blocking(service, |s| s.list_players()).await?;
    Ok(Json(players.iter().map(PlayerResponse::from).collect()))
}

/// `POST /api/outcome`
///
/// Pure classification; nothing is stored, so no blocking hop is needed.
#[instrument(skip(service, request), fields(state = %request.state))]
pub async fn evaluate_outcome(
    State(service): State<Arc<GameService>>,
    ApiJson(request): ApiJson<EvaluateRequest>,
) -> ApiResult<Json<OutcomeResponse>> {
    let (board, outcome) = service.evaluate_board(&request.state)?;
    Ok(Json(OutcomeResponse::new(&board, outcome)))
}
