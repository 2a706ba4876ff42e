//! League endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::audit::{Actor, Stamp};
use crate::error::ApiError;
use crate::model::league::LeagueInput;
use crate::service::{LeagueInclude, LeagueService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    include: Option<String>,
}

fn parse_include(raw: Option<&str>) -> Result<Option<LeagueInclude>, ApiError> {
    match raw {
        None => Ok(None),
        Some("teams") => Ok(Some(LeagueInclude::Teams)),
        Some("team_count") => Ok(Some(LeagueInclude::TeamCount)),
        Some(other) => Err(ApiError::Validation(format!("unknown include '{other}'"))),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let include = parse_include(params.include.as_deref())?;
    let leagues = LeagueService::list(&state.pool, include).await?;
    Ok(Json(leagues))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let league = LeagueService::get(&state.pool, &id).await?;
    Ok(Json(league))
}

pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<LeagueInput>,
) -> Result<impl IntoResponse, ApiError> {
    let league = LeagueService::create(&state.pool, &input, &Stamp::from(&actor)).await?;
    let location = format!("/api/leagues/{}", league.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(league),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: Actor,
    Json(input): Json<LeagueInput>,
) -> Result<StatusCode, ApiError> {
    LeagueService::update(&state.pool, &id, &input, &Stamp::from(&actor)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    LeagueService::delete(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
