use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A player's assignment to a team. The pair is the whole row; it doubles as
/// the create/update payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub player_id: i64,
    pub team_id: i64,
}
