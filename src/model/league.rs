use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::team::TeamDto;

/// League row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct LeagueRow {
    pub id: String,
    pub name: String,
}

/// League as served. Team projections are filled only when the request asks
/// for them.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<TeamDto>>,
}

impl From<LeagueRow> for LeagueDto {
    fn from(row: LeagueRow) -> Self {
        LeagueDto {
            id: row.id,
            name: row.name,
            team_count: None,
            teams: None,
        }
    }
}

/// Create/update payload. `id` is the two-letter league code.
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueInput {
    pub id: String,
    pub name: String,
}
