//! One-league-per-player rule, evaluated inside the mutating transaction
//! after the tentative write and before commit. A failure aborts the whole
//! transaction, so the store is left exactly as it was before the call.

use sqlx::SqliteConnection;

use crate::error::ApiError;

const RULE_MESSAGE: &str = "a player can only be in one league at a time";

/// Fail if `player_id`'s memberships now span more than one league. Run
/// after inserting or re-pointing a membership row.
pub async fn check_player(conn: &mut SqliteConnection, player_id: i64) -> Result<(), ApiError> {
    let (leagues,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(DISTINCT t.league_id)
        FROM memberships m
        JOIN teams t ON t.id = m.team_id
        WHERE m.player_id = ?
        "#,
    )
    .bind(player_id)
    .fetch_one(&mut *conn)
    .await?;

    if leagues > 1 {
        return Err(ApiError::LeagueRule(RULE_MESSAGE.to_string()));
    }
    Ok(())
}

/// Fail if any player holding a membership on `team_id` now spans more than
/// one league. Run after a team's league assignment changes.
pub async fn check_team(conn: &mut SqliteConnection, team_id: i64) -> Result<(), ApiError> {
    let offender: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT m.player_id
        FROM memberships m
        JOIN teams t ON t.id = m.team_id
        WHERE m.player_id IN (SELECT player_id FROM memberships WHERE team_id = ?)
        GROUP BY m.player_id
        HAVING COUNT(DISTINCT t.league_id) > 1
        LIMIT 1
        "#,
    )
    .bind(team_id)
    .fetch_optional(&mut *conn)
    .await?;

    if offender.is_some() {
        return Err(ApiError::LeagueRule(RULE_MESSAGE.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::error::ApiError;

    /// Two leagues, one team in each, one player on team 1.
    async fn fixture(pool: &sqlx::SqlitePool) {
        for (id, name) in [("WC", "World Cup"), ("BU", "Bundesliga")] {
            sqlx::query(
                "INSERT INTO leagues (id, name, created_at, created_by, updated_at, updated_by) \
                 VALUES (?, ?, '2026-01-01T00:00:00Z', 'test', '2026-01-01T00:00:00Z', 'test')",
            )
            .bind(id)
            .bind(name)
            .execute(pool)
            .await
            .unwrap();
        }
        for (id, name, league) in [(1i64, "Badgers", "WC"), (2i64, "Royals", "BU")] {
            sqlx::query(
                "INSERT INTO teams (id, name, budget, league_id, created_at, created_by, updated_at, updated_by) \
                 VALUES (?, ?, 1000, ?, '2026-01-01T00:00:00Z', 'test', '2026-01-01T00:00:00Z', 'test')",
            )
            .bind(id)
            .bind(name)
            .bind(league)
            .execute(pool)
            .await
            .unwrap();
        }
        sqlx::query(
            "INSERT INTO players (id, first_name, last_name, jersey, dob, fee_paid, email, version, \
             created_at, created_by, updated_at, updated_by) \
             VALUES (7, 'Anna', 'Satie', '10', '1990-04-02', 150, 'anna@x.com', ?, \
             '2026-01-01T00:00:00Z', 'test', '2026-01-01T00:00:00Z', 'test')",
        )
        .bind(uuid::Uuid::new_v4())
        .execute(pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO memberships (player_id, team_id) VALUES (7, 1)")
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn single_league_passes() {
        let pool = test_pool().await;
        fixture(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        check_player(&mut *conn, 7).await.unwrap();
        check_team(&mut *conn, 1).await.unwrap();
    }

    #[tokio::test]
    async fn two_leagues_fail_for_player() {
        let pool = test_pool().await;
        fixture(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        sqlx::query("INSERT INTO memberships (player_id, team_id) VALUES (7, 2)")
            .execute(&mut *conn)
            .await
            .unwrap();
        let err = check_player(&mut *conn, 7).await.unwrap_err();
        assert!(matches!(err, ApiError::LeagueRule(_)));
    }

    #[tokio::test]
    async fn team_check_sees_players_other_memberships() {
        let pool = test_pool().await;
        fixture(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        // Moving team 1 into BU keeps the player in a single league.
        sqlx::query("UPDATE teams SET league_id = 'BU' WHERE id = 1")
            .execute(&mut *conn)
            .await
            .unwrap();
        check_team(&mut *conn, 1).await.unwrap();

        // A second membership on team 2 plus team 1 back in WC spans two
        // leagues and must fail.
        sqlx::query("INSERT INTO memberships (player_id, team_id) VALUES (7, 2)")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("UPDATE teams SET league_id = 'WC' WHERE id = 1")
            .execute(&mut *conn)
            .await
            .unwrap();
        let err = check_team(&mut *conn, 1).await.unwrap_err();
        assert!(matches!(err, ApiError::LeagueRule(_)));
    }
}
