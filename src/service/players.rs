//! Player CRUD with optimistic concurrency. Every insert and successful
//! update regenerates the row's version token; updates are guarded twice:
//! a token pre-check against the value the caller last read, then a
//! version-qualified UPDATE that catches a row changed after our own read.

use std::collections::HashMap;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::audit::Stamp;
use crate::error::ApiError;
use crate::model::player::{PlayerDto, PlayerInput, PlayerRow};
use crate::model::team::TeamDto;
use crate::service::validation;

const PLAYER_COLUMNS: &str = "id, first_name, last_name, jersey, dob, fee_paid, email, version";

const DUPLICATE_EMAIL: &str = "a player with that email already exists";

pub struct PlayerService;

impl PlayerService {
    pub async fn list(pool: &SqlitePool, team: Option<i64>) -> Result<Vec<PlayerDto>, ApiError> {
        let rows: Vec<PlayerRow> = match team {
            Some(team_id) => {
                sqlx::query_as(&format!(
                    "SELECT {PLAYER_COLUMNS} FROM players \
                     WHERE id IN (SELECT player_id FROM memberships WHERE team_id = ?) \
                     ORDER BY id"
                ))
                .bind(team_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id"))
                    .fetch_all(pool)
                    .await?
            }
        };
        let mut players: Vec<PlayerDto> = rows.into_iter().map(PlayerDto::from).collect();

        let teams: Vec<(i64, i64, String, f64)> = sqlx::query_as(
            "SELECT m.player_id, t.id, t.name, t.budget \
             FROM memberships m JOIN teams t ON t.id = m.team_id ORDER BY t.id",
        )
        .fetch_all(pool)
        .await?;
        let mut by_player: HashMap<i64, Vec<TeamDto>> = HashMap::new();
        for (player_id, id, name, budget) in teams {
            by_player.entry(player_id).or_default().push(TeamDto {
                id,
                name,
                budget,
                league_id: None,
                league: None,
                player_count: None,
                players: None,
            });
        }
        for player in &mut players {
            player.teams = Some(by_player.remove(&player.id).unwrap_or_default());
        }
        Ok(players)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<PlayerDto, ApiError> {
        let row: Option<PlayerRow> =
            sqlx::query_as(&format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?"))
                .bind(id)
                .fetch_optional(pool)
                .await?;
        let mut player =
            PlayerDto::from(row.ok_or_else(|| ApiError::NotFound(format!("player {id}")))?);

        let teams: Vec<(i64, String, f64)> = sqlx::query_as(
            "SELECT t.id, t.name, t.budget \
             FROM memberships m JOIN teams t ON t.id = m.team_id \
             WHERE m.player_id = ? ORDER BY t.id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        player.teams = Some(
            teams
                .into_iter()
                .map(|(id, name, budget)| TeamDto {
                    id,
                    name,
                    budget,
                    league_id: None,
                    league: None,
                    player_count: None,
                    players: None,
                })
                .collect(),
        );
        Ok(player)
    }

    pub async fn create(
        pool: &SqlitePool,
        input: &PlayerInput,
        stamp: &Stamp,
    ) -> Result<PlayerDto, ApiError> {
        validation::validate_player(input)?;
        let version = Uuid::new_v4();
        let result = sqlx::query(
            "INSERT INTO players \
             (first_name, last_name, jersey, dob, fee_paid, email, version, \
              created_at, created_by, updated_at, updated_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.jersey)
        .bind(input.dob)
        .bind(input.fee_paid)
        .bind(&input.email)
        .bind(version)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(stamp.at)
        .bind(&stamp.by)
        .execute(pool)
        .await
        .map_err(|e| ApiError::from_constraint(e, DUPLICATE_EMAIL, "player cannot be saved"))?;
        let id = result.last_insert_rowid();
        tracing::debug!(id, "player created");
        Ok(PlayerDto {
            id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            jersey: input.jersey.clone(),
            dob: input.dob,
            fee_paid: input.fee_paid,
            email: input.email.clone(),
            teams: Some(Vec::new()),
            version: Some(version),
        })
    }

    /// Apply an update guarded by the version token. Returns the player with
    /// the freshly generated token so the caller can re-arm the guard.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        input: &PlayerInput,
        stamp: &Stamp,
    ) -> Result<PlayerDto, ApiError> {
        if input.id.is_some_and(|body_id| body_id != id) {
            return Err(ApiError::Validation(
                "id in body does not match the player".into(),
            ));
        }
        validation::validate_player(input)?;

        let mut tx = pool.begin().await?;
        let current: Option<PlayerRow> =
            sqlx::query_as(&format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?"))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = current.ok_or_else(|| ApiError::NotFound(format!("player {id}")))?;

        if let Some(expected) = input.version {
            if expected != current.version {
                return Err(ApiError::StaleVersion(
                    "player has been changed by another user; fetch the record and try again"
                        .into(),
                ));
            }
        }

        let version = Uuid::new_v4();
        let result = sqlx::query(
            "UPDATE players SET first_name = ?, last_name = ?, jersey = ?, dob = ?, \
             fee_paid = ?, email = ?, version = ?, updated_at = ?, updated_by = ? \
             WHERE id = ? AND version = ?",
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.jersey)
        .bind(input.dob)
        .bind(input.fee_paid)
        .bind(&input.email)
        .bind(version)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(id)
        .bind(current.version)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::from_constraint(e, DUPLICATE_EMAIL, "player cannot be saved"))?;
        if result.rows_affected() == 0 {
            return Err(ApiError::ModifiedConcurrently(
                "player was updated by another request; fetch the record and try again".into(),
            ));
        }
        tx.commit().await?;
        Self::get(pool, id).await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        // Memberships go with the player (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("player {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use chrono::NaiveDate;

    fn stamp() -> Stamp {
        Stamp::new("test")
    }

    fn input(email: &str) -> PlayerInput {
        PlayerInput {
            id: None,
            first_name: "Anna".into(),
            last_name: "Satie".into(),
            jersey: "10".into(),
            dob: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
            fee_paid: 150.0,
            email: email.into(),
            version: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_a_version_token() {
        let pool = test_pool().await;
        let created = PlayerService::create(&pool, &input("anna@x.com"), &stamp())
            .await
            .unwrap();
        assert!(created.version.is_some());
        assert!(created.teams.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_rejected_and_first_player_kept() {
        let pool = test_pool().await;
        let first = PlayerService::create(&pool, &input("anna@x.com"), &stamp())
            .await
            .unwrap();
        let mut second = input("anna@x.com");
        second.first_name = "Erik".into();
        let err = PlayerService::create(&pool, &second, &stamp())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Duplicate(_)));

        let players = PlayerService::list(&pool, None).await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, first.id);
        assert_eq!(players[0].first_name, "Anna");
    }

    #[tokio::test]
    async fn update_with_current_token_rotates_it() {
        let pool = test_pool().await;
        let created = PlayerService::create(&pool, &input("anna@x.com"), &stamp())
            .await
            .unwrap();
        let mut change = input("anna@x.com");
        change.jersey = "11".into();
        change.version = created.version;
        let updated = PlayerService::update(&pool, created.id, &change, &stamp())
            .await
            .unwrap();
        assert_eq!(updated.jersey, "11");
        assert!(updated.version.is_some());
        assert_ne!(updated.version, created.version);
    }

    #[tokio::test]
    async fn stale_token_is_rejected_and_row_unchanged() {
        let pool = test_pool().await;
        let created = PlayerService::create(&pool, &input("anna@x.com"), &stamp())
            .await
            .unwrap();

        // A first writer wins and rotates the token.
        let mut winner = input("anna@x.com");
        winner.jersey = "11".into();
        winner.version = created.version;
        PlayerService::update(&pool, created.id, &winner, &stamp())
            .await
            .unwrap();

        // A second writer still holding the original token loses.
        let mut loser = input("anna@x.com");
        loser.jersey = "99".into();
        loser.version = created.version;
        let err = PlayerService::update(&pool, created.id, &loser, &stamp())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::StaleVersion(_)));

        let current = PlayerService::get(&pool, created.id).await.unwrap();
        assert_eq!(current.jersey, "11");
    }

    #[tokio::test]
    async fn absent_token_skips_the_pre_check() {
        let pool = test_pool().await;
        let created = PlayerService::create(&pool, &input("anna@x.com"), &stamp())
            .await
            .unwrap();
        let mut change = input("anna@x.com");
        change.jersey = "42".into();
        change.version = None;
        let updated = PlayerService::update(&pool, created.id, &change, &stamp())
            .await
            .unwrap();
        assert_eq!(updated.jersey, "42");
    }

    #[tokio::test]
    async fn update_missing_player_is_not_found() {
        let pool = test_pool().await;
        let err = PlayerService::update(&pool, 99, &input("x@y.com"), &stamp())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
