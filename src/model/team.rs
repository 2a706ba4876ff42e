use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::league::LeagueDto;
use super::player::PlayerDto;

/// Team row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct TeamRow {
    pub id: i64,
    pub name: String,
    pub budget: f64,
    pub league_id: String,
}

/// Team as served. The league is nested on team endpoints and omitted when
/// the team itself is nested under a league; player projections are filled
/// only when asked for.
#[derive(Debug, Clone, Serialize)]
pub struct TeamDto {
    pub id: i64,
    pub name: String,
    pub budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<LeagueDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerDto>>,
}

impl From<TeamRow> for TeamDto {
    fn from(row: TeamRow) -> Self {
        TeamDto {
            id: row.id,
            name: row.name,
            budget: row.budget,
            league_id: None,
            league: None,
            player_count: None,
            players: None,
        }
    }
}

/// Create/update payload. On update, an `id` present in the body must match
/// the path.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamInput {
    pub id: Option<i64>,
    pub name: String,
    pub budget: f64,
    pub league_id: String,
}
