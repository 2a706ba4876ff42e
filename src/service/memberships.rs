//! Membership CRUD. Inserting or re-pointing a row runs the
//! one-league-per-player check inside the same transaction.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::ApiError;
use crate::model::membership::Membership;
use crate::service::league_rule;

const DUPLICATE_PAIR: &str = "player is already assigned to that team";

pub struct MembershipService;

impl MembershipService {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Membership>, ApiError> {
        let rows: Vec<Membership> = sqlx::query_as(
            "SELECT player_id, team_id FROM memberships ORDER BY player_id, team_id",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn get(
        pool: &SqlitePool,
        player_id: i64,
        team_id: i64,
    ) -> Result<Membership, ApiError> {
        let row: Option<Membership> = sqlx::query_as(
            "SELECT player_id, team_id FROM memberships WHERE player_id = ? AND team_id = ?",
        )
        .bind(player_id)
        .bind(team_id)
        .fetch_optional(pool)
        .await?;
        row.ok_or_else(|| {
            ApiError::NotFound(format!("membership ({player_id}, {team_id})"))
        })
    }

    pub async fn create(pool: &SqlitePool, input: &Membership) -> Result<Membership, ApiError> {
        let mut tx = pool.begin().await?;
        ensure_pair_exists(&mut tx, input).await?;
        sqlx::query("INSERT INTO memberships (player_id, team_id) VALUES (?, ?)")
            .bind(input.player_id)
            .bind(input.team_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                ApiError::from_constraint(e, DUPLICATE_PAIR, "membership cannot be saved")
            })?;
        league_rule::check_player(&mut *tx, input.player_id).await?;
        tx.commit().await?;
        tracing::debug!(player_id = input.player_id, team_id = input.team_id, "membership created");
        Ok(*input)
    }

    /// Re-point an existing membership at a new (player, team) pair.
    pub async fn update(
        pool: &SqlitePool,
        player_id: i64,
        team_id: i64,
        next: &Membership,
    ) -> Result<(), ApiError> {
        let mut tx = pool.begin().await?;
        let current: Option<Membership> = sqlx::query_as(
            "SELECT player_id, team_id FROM memberships WHERE player_id = ? AND team_id = ?",
        )
        .bind(player_id)
        .bind(team_id)
        .fetch_optional(&mut *tx)
        .await?;
        if current.is_none() {
            return Err(ApiError::NotFound(format!(
                "membership ({player_id}, {team_id})"
            )));
        }
        ensure_pair_exists(&mut tx, next).await?;
        sqlx::query(
            "UPDATE memberships SET player_id = ?, team_id = ? \
             WHERE player_id = ? AND team_id = ?",
        )
        .bind(next.player_id)
        .bind(next.team_id)
        .bind(player_id)
        .bind(team_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::from_constraint(e, DUPLICATE_PAIR, "membership cannot be saved"))?;
        league_rule::check_player(&mut *tx, next.player_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, player_id: i64, team_id: i64) -> Result<(), ApiError> {
        let result =
            sqlx::query("DELETE FROM memberships WHERE player_id = ? AND team_id = ?")
                .bind(player_id)
                .bind(team_id)
                .execute(pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!(
                "membership ({player_id}, {team_id})"
            )));
        }
        Ok(())
    }
}

/// Both ends of the pair must exist before we touch the membership table so
/// the caller gets a precise not-found instead of a bare constraint error.
async fn ensure_pair_exists(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    pair: &Membership,
) -> Result<(), ApiError> {
    let conn: &mut SqliteConnection = &mut *tx;
    let player: Option<(i64,)> = sqlx::query_as("SELECT id FROM players WHERE id = ?")
        .bind(pair.player_id)
        .fetch_optional(&mut *conn)
        .await?;
    if player.is_none() {
        return Err(ApiError::NotFound(format!("player {}", pair.player_id)));
    }
    let team: Option<(i64,)> = sqlx::query_as("SELECT id FROM teams WHERE id = ?")
        .bind(pair.team_id)
        .fetch_optional(&mut *conn)
        .await?;
    if team.is_none() {
        return Err(ApiError::NotFound(format!("team {}", pair.team_id)));
    }
    Ok(())
}
