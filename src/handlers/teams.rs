//! Team endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::audit::{Actor, Stamp};
use crate::error::ApiError;
use crate::model::team::TeamInput;
use crate::service::{TeamInclude, TeamService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    include: Option<String>,
    league: Option<String>,
}

fn parse_include(raw: Option<&str>) -> Result<Option<TeamInclude>, ApiError> {
    match raw {
        None => Ok(None),
        Some("players") => Ok(Some(TeamInclude::Players)),
        Some("player_count") => Ok(Some(TeamInclude::PlayerCount)),
        Some(other) => Err(ApiError::Validation(format!("unknown include '{other}'"))),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let include = parse_include(params.include.as_deref())?;
    let teams = TeamService::list(&state.pool, params.league.as_deref(), include).await?;
    Ok(Json(teams))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::get(&state.pool, id).await?;
    Ok(Json(team))
}

pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<TeamInput>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::create(&state.pool, &input, &Stamp::from(&actor)).await?;
    let location = format!("/api/teams/{}", team.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(team),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: Actor,
    Json(input): Json<TeamInput>,
) -> Result<StatusCode, ApiError> {
    TeamService::update(&state.pool, id, &input, &Stamp::from(&actor)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    TeamService::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
