//! League CRUD.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::audit::Stamp;
use crate::error::ApiError;
use crate::model::league::{LeagueDto, LeagueInput, LeagueRow};
use crate::model::team::{TeamDto, TeamRow};
use crate::service::validation;

/// Projection requested for league listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueInclude {
    Teams,
    TeamCount,
}

pub struct LeagueService;

impl LeagueService {
    pub async fn list(
        pool: &SqlitePool,
        include: Option<LeagueInclude>,
    ) -> Result<Vec<LeagueDto>, ApiError> {
        let rows: Vec<LeagueRow> = sqlx::query_as("SELECT id, name FROM leagues ORDER BY id")
            .fetch_all(pool)
            .await?;
        let mut leagues: Vec<LeagueDto> = rows.into_iter().map(LeagueDto::from).collect();

        match include {
            Some(LeagueInclude::TeamCount) => {
                let counts: Vec<(String, i64)> =
                    sqlx::query_as("SELECT league_id, COUNT(*) FROM teams GROUP BY league_id")
                        .fetch_all(pool)
                        .await?;
                let by_league: HashMap<String, i64> = counts.into_iter().collect();
                for league in &mut leagues {
                    league.team_count = Some(by_league.get(&league.id).copied().unwrap_or(0));
                }
            }
            Some(LeagueInclude::Teams) => {
                let teams: Vec<TeamRow> =
                    sqlx::query_as("SELECT id, name, budget, league_id FROM teams ORDER BY id")
                        .fetch_all(pool)
                        .await?;
                let mut by_league: HashMap<String, Vec<TeamDto>> = HashMap::new();
                for team in teams {
                    let league_id = team.league_id.clone();
                    by_league.entry(league_id).or_default().push(TeamDto::from(team));
                }
                for league in &mut leagues {
                    league.teams = Some(by_league.remove(&league.id).unwrap_or_default());
                }
            }
            None => {}
        }
        Ok(leagues)
    }

    pub async fn get(pool: &SqlitePool, id: &str) -> Result<LeagueDto, ApiError> {
        let row: Option<LeagueRow> = sqlx::query_as("SELECT id, name FROM leagues WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(LeagueDto::from)
            .ok_or_else(|| ApiError::NotFound(format!("league {id}")))
    }

    pub async fn create(
        pool: &SqlitePool,
        input: &LeagueInput,
        stamp: &Stamp,
    ) -> Result<LeagueDto, ApiError> {
        validation::validate_league(input)?;
        sqlx::query(
            "INSERT INTO leagues (id, name, created_at, created_by, updated_at, updated_by) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.id)
        .bind(&input.name)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(stamp.at)
        .bind(&stamp.by)
        .execute(pool)
        .await
        .map_err(|e| {
            ApiError::from_constraint(
                e,
                "a league with that code already exists",
                "league cannot be saved",
            )
        })?;
        tracing::debug!(id = %input.id, "league created");
        Ok(LeagueDto {
            id: input.id.clone(),
            name: input.name.clone(),
            team_count: None,
            teams: None,
        })
    }

    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        input: &LeagueInput,
        stamp: &Stamp,
    ) -> Result<(), ApiError> {
        if input.id != id {
            return Err(ApiError::Validation(
                "id in body does not match the league".into(),
            ));
        }
        validation::validate_league(input)?;
        let result = sqlx::query(
            "UPDATE leagues SET name = ?, updated_at = ?, updated_by = ? WHERE id = ?",
        )
        .bind(&input.name)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("league {id}")));
        }
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM leagues WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                ApiError::from_constraint(
                    e,
                    "league cannot be deleted",
                    "league still owns teams",
                )
            })?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("league {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn stamp() -> Stamp {
        Stamp::new("test")
    }

    fn input(id: &str, name: &str) -> LeagueInput {
        LeagueInput {
            id: id.into(),
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn create_get_update_delete() {
        let pool = test_pool().await;
        let created = LeagueService::create(&pool, &input("WC", "World Cup"), &stamp())
            .await
            .unwrap();
        assert_eq!(created.id, "WC");

        let fetched = LeagueService::get(&pool, "WC").await.unwrap();
        assert_eq!(fetched.name, "World Cup");

        LeagueService::update(&pool, "WC", &input("WC", "World Cup 2026"), &stamp())
            .await
            .unwrap();
        let fetched = LeagueService::get(&pool, "WC").await.unwrap();
        assert_eq!(fetched.name, "World Cup 2026");

        LeagueService::delete(&pool, "WC").await.unwrap();
        let err = LeagueService::get(&pool, "WC").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected() {
        let pool = test_pool().await;
        LeagueService::create(&pool, &input("WC", "World Cup"), &stamp())
            .await
            .unwrap();
        let err = LeagueService::create(&pool, &input("WC", "Other"), &stamp())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_rejects_mismatched_id() {
        let pool = test_pool().await;
        LeagueService::create(&pool, &input("WC", "World Cup"), &stamp())
            .await
            .unwrap();
        let err = LeagueService::update(&pool, "WC", &input("BU", "Bundesliga"), &stamp())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_list_is_ok() {
        let pool = test_pool().await;
        let leagues = LeagueService::list(&pool, None).await.unwrap();
        assert!(leagues.is_empty());
    }

    #[tokio::test]
    async fn missing_league_is_not_found() {
        let pool = test_pool().await;
        assert!(matches!(
            LeagueService::get(&pool, "ZZ").await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            LeagueService::delete(&pool, "ZZ").await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
