use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::team::TeamDto;

/// Player row as stored. `version` is the opaque token regenerated on every
/// write to the row.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub jersey: String,
    pub dob: NaiveDate,
    pub fee_paid: f64,
    pub email: String,
    pub version: Uuid,
}

/// Player as served, teams nested and the current version token included so
/// callers can send it back with their next update.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub jersey: String,
    pub dob: NaiveDate,
    pub fee_paid: f64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<TeamDto>>,
    /// Omitted on nested projections; always present on player endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Uuid>,
}

impl From<PlayerRow> for PlayerDto {
    fn from(row: PlayerRow) -> Self {
        PlayerDto {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            jersey: row.jersey,
            dob: row.dob,
            fee_paid: row.fee_paid,
            email: row.email,
            teams: None,
            version: Some(row.version),
        }
    }
}

/// Create/update payload. `version` is the token last read by the caller;
/// leaving it out skips the staleness pre-check.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerInput {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub jersey: String,
    pub dob: NaiveDate,
    pub fee_paid: f64,
    pub email: String,
    pub version: Option<Uuid>,
}
