//! Team CRUD. Reassigning a team's league runs the one-league-per-player
//! check inside the same transaction.

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::audit::Stamp;
use crate::error::ApiError;
use crate::model::league::LeagueDto;
use crate::model::player::PlayerDto;
use crate::model::team::{TeamDto, TeamInput, TeamRow};
use crate::service::{league_rule, validation};

/// Projection requested for team listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamInclude {
    Players,
    PlayerCount,
}

pub struct TeamService;

impl TeamService {
    pub async fn list(
        pool: &SqlitePool,
        league: Option<&str>,
        include: Option<TeamInclude>,
    ) -> Result<Vec<TeamDto>, ApiError> {
        let rows: Vec<(i64, String, f64, String, String)> = match league {
            Some(league_id) => {
                sqlx::query_as(
                    "SELECT t.id, t.name, t.budget, t.league_id, l.name \
                     FROM teams t JOIN leagues l ON l.id = t.league_id \
                     WHERE t.league_id = ? ORDER BY t.id",
                )
                .bind(league_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT t.id, t.name, t.budget, t.league_id, l.name \
                     FROM teams t JOIN leagues l ON l.id = t.league_id ORDER BY t.id",
                )
                .fetch_all(pool)
                .await?
            }
        };

        let mut teams: Vec<TeamDto> = rows
            .into_iter()
            .map(|(id, name, budget, league_id, league_name)| TeamDto {
                id,
                name,
                budget,
                league_id: Some(league_id.clone()),
                league: Some(LeagueDto {
                    id: league_id,
                    name: league_name,
                    team_count: None,
                    teams: None,
                }),
                player_count: None,
                players: None,
            })
            .collect();

        match include {
            Some(TeamInclude::PlayerCount) => {
                let counts: Vec<(i64, i64)> =
                    sqlx::query_as("SELECT team_id, COUNT(*) FROM memberships GROUP BY team_id")
                        .fetch_all(pool)
                        .await?;
                let by_team: HashMap<i64, i64> = counts.into_iter().collect();
                for team in &mut teams {
                    team.player_count = Some(by_team.get(&team.id).copied().unwrap_or(0));
                }
            }
            Some(TeamInclude::Players) => {
                let rows: Vec<(i64, i64, String, String, String, chrono::NaiveDate, f64, String)> =
                    sqlx::query_as(
                        "SELECT m.team_id, p.id, p.first_name, p.last_name, p.jersey, p.dob, \
                         p.fee_paid, p.email \
                         FROM memberships m JOIN players p ON p.id = m.player_id ORDER BY p.id",
                    )
                    .fetch_all(pool)
                    .await?;
                let mut by_team: HashMap<i64, Vec<PlayerDto>> = HashMap::new();
                for (team_id, id, first_name, last_name, jersey, dob, fee_paid, email) in rows {
                    by_team.entry(team_id).or_default().push(PlayerDto {
                        id,
                        first_name,
                        last_name,
                        jersey,
                        dob,
                        fee_paid,
                        email,
                        teams: None,
                        version: None,
                    });
                }
                for team in &mut teams {
                    team.players = Some(by_team.remove(&team.id).unwrap_or_default());
                }
            }
            None => {}
        }
        Ok(teams)
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<TeamDto, ApiError> {
        let row: Option<(i64, String, f64, String, String)> = sqlx::query_as(
            "SELECT t.id, t.name, t.budget, t.league_id, l.name \
             FROM teams t JOIN leagues l ON l.id = t.league_id WHERE t.id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        let (id, name, budget, league_id, league_name) =
            row.ok_or_else(|| ApiError::NotFound(format!("team {id}")))?;
        Ok(TeamDto {
            id,
            name,
            budget,
            league_id: Some(league_id.clone()),
            league: Some(LeagueDto {
                id: league_id,
                name: league_name,
                team_count: None,
                teams: None,
            }),
            player_count: None,
            players: None,
        })
    }

    pub async fn create(
        pool: &SqlitePool,
        input: &TeamInput,
        stamp: &Stamp,
    ) -> Result<TeamDto, ApiError> {
        validation::validate_team(input)?;
        let mut tx = pool.begin().await?;
        let league: Option<(String,)> = sqlx::query_as("SELECT id FROM leagues WHERE id = ?")
            .bind(&input.league_id)
            .fetch_optional(&mut *tx)
            .await?;
        if league.is_none() {
            return Err(ApiError::NotFound(format!("league {}", input.league_id)));
        }
        let result = sqlx::query(
            "INSERT INTO teams (name, budget, league_id, created_at, created_by, updated_at, updated_by) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(input.budget)
        .bind(&input.league_id)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(stamp.at)
        .bind(&stamp.by)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::from_constraint(e, "team already exists", "team cannot be saved"))?;
        let id = result.last_insert_rowid();
        tx.commit().await?;
        tracing::debug!(id, "team created");
        Self::get(pool, id).await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        input: &TeamInput,
        stamp: &Stamp,
    ) -> Result<(), ApiError> {
        if input.id.is_some_and(|body_id| body_id != id) {
            return Err(ApiError::Validation(
                "id in body does not match the team".into(),
            ));
        }
        validation::validate_team(input)?;

        let mut tx = pool.begin().await?;
        let current: Option<TeamRow> =
            sqlx::query_as("SELECT id, name, budget, league_id FROM teams WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = current.ok_or_else(|| ApiError::NotFound(format!("team {id}")))?;

        let league_changed = input.league_id != current.league_id;
        if league_changed {
            let league: Option<(String,)> = sqlx::query_as("SELECT id FROM leagues WHERE id = ?")
                .bind(&input.league_id)
                .fetch_optional(&mut *tx)
                .await?;
            if league.is_none() {
                return Err(ApiError::NotFound(format!("league {}", input.league_id)));
            }
        }

        sqlx::query(
            "UPDATE teams SET name = ?, budget = ?, league_id = ?, updated_at = ?, updated_by = ? \
             WHERE id = ?",
        )
        .bind(&input.name)
        .bind(input.budget)
        .bind(&input.league_id)
        .bind(stamp.at)
        .bind(&stamp.by)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::from_constraint(e, "team already exists", "team cannot be saved"))?;

        if league_changed {
            league_rule::check_team(&mut *tx, id).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                ApiError::from_constraint(
                    e,
                    "team cannot be deleted",
                    "team still has players assigned",
                )
            })?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("team {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::model::league::LeagueInput;
    use crate::service::leagues::LeagueService;

    fn stamp() -> Stamp {
        Stamp::new("test")
    }

    fn team(name: &str, league_id: &str) -> TeamInput {
        TeamInput {
            id: None,
            name: name.into(),
            budget: 1000.0,
            league_id: league_id.into(),
        }
    }

    async fn league(pool: &SqlitePool, id: &str, name: &str) {
        LeagueService::create(
            pool,
            &LeagueInput {
                id: id.into(),
                name: name.into(),
            },
            &stamp(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn create_nests_league() {
        let pool = test_pool().await;
        league(&pool, "WC", "World Cup").await;
        let created = TeamService::create(&pool, &team("Badgers", "WC"), &stamp())
            .await
            .unwrap();
        assert_eq!(created.league.as_ref().unwrap().name, "World Cup");
        assert_eq!(created.league_id.as_deref(), Some("WC"));
    }

    #[tokio::test]
    async fn create_requires_existing_league() {
        let pool = test_pool().await;
        let err = TeamService::create(&pool, &team("Badgers", "ZZ"), &stamp())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_league_and_counts_players() {
        let pool = test_pool().await;
        league(&pool, "WC", "World Cup").await;
        league(&pool, "BU", "Bundesliga").await;
        TeamService::create(&pool, &team("Badgers", "WC"), &stamp())
            .await
            .unwrap();
        TeamService::create(&pool, &team("Royals", "BU"), &stamp())
            .await
            .unwrap();

        let all = TeamService::list(&pool, None, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let wc = TeamService::list(&pool, Some("WC"), Some(TeamInclude::PlayerCount))
            .await
            .unwrap();
        assert_eq!(wc.len(), 1);
        assert_eq!(wc[0].name, "Badgers");
        assert_eq!(wc[0].player_count, Some(0));
    }

    #[tokio::test]
    async fn delete_missing_team_is_not_found() {
        let pool = test_pool().await;
        let err = TeamService::delete(&pool, 99).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn league_delete_blocked_while_owning_teams() {
        let pool = test_pool().await;
        league(&pool, "WC", "World Cup").await;
        TeamService::create(&pool, &team("Badgers", "WC"), &stamp())
            .await
            .unwrap();
        let err = LeagueService::delete(&pool, "WC").await.unwrap_err();
        assert!(matches!(err, ApiError::InUse(_)));
        // The league is still there.
        LeagueService::get(&pool, "WC").await.unwrap();
    }
}
