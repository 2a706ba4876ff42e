//! Player endpoints. Update returns the refreshed version token so callers
//! can re-arm the concurrency guard.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::audit::{Actor, Stamp};
use crate::error::ApiError;
use crate::model::player::PlayerInput;
use crate::service::PlayerService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    team: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let players = PlayerService::list(&state.pool, params.team).await?;
    Ok(Json(players))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let player = PlayerService::get(&state.pool, id).await?;
    Ok(Json(player))
}

pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<PlayerInput>,
) -> Result<impl IntoResponse, ApiError> {
    let player = PlayerService::create(&state.pool, &input, &Stamp::from(&actor)).await?;
    let location = format!("/api/players/{}", player.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(player),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
    Json(input): Json<PlayerInput>,
) -> Result<impl IntoResponse, ApiError> {
    let player = PlayerService::update(&state.pool, id, &input, &Stamp::from(&actor)).await?;
    Ok(Json(player))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    PlayerService::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
