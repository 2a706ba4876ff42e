//! Membership endpoints, addressed by the composite (player, team) key.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ApiError;
use crate::model::membership::Membership;
use crate::service::MembershipService;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = MembershipService::list(&state.pool).await?;
    Ok(Json(rows))
}

pub async fn get(
    State(state): State<AppState>,
    Path((player_id, team_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let row = MembershipService::get(&state.pool, player_id, team_id).await?;
    Ok(Json(row))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<Membership>,
) -> Result<impl IntoResponse, ApiError> {
    let row = MembershipService::create(&state.pool, &input).await?;
    let location = format!("/api/memberships/{}/{}", row.player_id, row.team_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(row),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path((player_id, team_id)): Path<(i64, i64)>,
    Json(next): Json<Membership>,
) -> Result<StatusCode, ApiError> {
    MembershipService::update(&state.pool, player_id, team_id, &next).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path((player_id, team_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    MembershipService::delete(&state.pool, player_id, team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
