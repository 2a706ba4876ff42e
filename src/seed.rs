//! Demo data, loaded when `SEED_DEMO_DATA` is set. Each table seeds only
//! when empty and the data is deterministic, so repeated boots are stable.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::audit::{Stamp, SEED_ACTOR};
use crate::error::ApiError;

const LEAGUES: [(&str, &str); 4] = [
    ("WC", "World Cup"),
    ("BU", "Bundesliga"),
    ("SA", "Serie A"),
    ("EN", "English Football League"),
];

const TEAM_NAMES: [&str; 10] = [
    "Badgers",
    "Bengals",
    "Royals",
    "Chili Peppers",
    "Cereal Killers",
    "Abusement Park",
    "Aztecs",
    "Red Dragons",
    "The Surge",
    "Demon Deacons",
];

const FIRST_NAMES: [&str; 10] = [
    "Sergei", "Janine", "Anna", "Erik", "Heloise", "Alyssa", "Enrico", "Claude", "Franz",
    "Terrence",
];

const LAST_NAMES: [&str; 5] = ["Rachmaninov", "Debussy", "Satie", "Prokofiev", "Bach"];

const EMAIL_DOMAINS: [&str; 5] = ["hotmail", "outlook", "gmail", "yahoo", "aol"];

const NUM_PLAYERS: usize = 50;

/// Load the demo roster: four leagues, ten teams, fifty players, one
/// membership per player (so every player sits in exactly one league).
pub async fn load_demo_data(pool: &SqlitePool) -> Result<(), ApiError> {
    let stamp = Stamp::new(SEED_ACTOR);

    if is_empty(pool, "SELECT COUNT(*) FROM leagues").await? {
        for (id, name) in LEAGUES {
            sqlx::query(
                "INSERT INTO leagues (id, name, created_at, created_by, updated_at, updated_by) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(name)
            .bind(stamp.at)
            .bind(&stamp.by)
            .bind(stamp.at)
            .bind(&stamp.by)
            .execute(pool)
            .await?;
        }
        tracing::info!(count = LEAGUES.len(), "seeded leagues");
    }

    if is_empty(pool, "SELECT COUNT(*) FROM teams").await? {
        for (i, name) in TEAM_NAMES.iter().enumerate() {
            let budget = (500 + i * 750) as f64;
            let league_id = LEAGUES[i % LEAGUES.len()].0;
            sqlx::query(
                "INSERT INTO teams (name, budget, league_id, created_at, created_by, updated_at, updated_by) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(name)
            .bind(budget)
            .bind(league_id)
            .bind(stamp.at)
            .bind(&stamp.by)
            .bind(stamp.at)
            .bind(&stamp.by)
            .execute(pool)
            .await?;
        }
        tracing::info!(count = TEAM_NAMES.len(), "seeded teams");
    }

    if is_empty(pool, "SELECT COUNT(*) FROM players").await? {
        for i in 0..NUM_PLAYERS {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[i / FIRST_NAMES.len()];
            let jersey = format!("{}", 10 + i);
            let dob = format!(
                "{:04}-{:02}-{:02}",
                1984 + (i % 20),
                1 + (i % 12),
                1 + (i % 28)
            );
            let fee_paid = (140 + (i % 16) * 10) as f64;
            let email = format!(
                "{}.{}@{}.com",
                first.to_lowercase(),
                last.to_lowercase(),
                EMAIL_DOMAINS[i % EMAIL_DOMAINS.len()]
            );
            sqlx::query(
                "INSERT INTO players \
                 (first_name, last_name, jersey, dob, fee_paid, email, version, \
                  created_at, created_by, updated_at, updated_by) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(first)
            .bind(last)
            .bind(jersey)
            .bind(dob)
            .bind(fee_paid)
            .bind(email)
            .bind(Uuid::new_v4())
            .bind(stamp.at)
            .bind(&stamp.by)
            .bind(stamp.at)
            .bind(&stamp.by)
            .execute(pool)
            .await?;
        }
        tracing::info!(count = NUM_PLAYERS, "seeded players");
    }

    if is_empty(pool, "SELECT COUNT(*) FROM memberships").await? {
        let player_ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM players ORDER BY id")
            .fetch_all(pool)
            .await?;
        let team_ids: Vec<(i64,)> = sqlx::query_as("SELECT id FROM teams ORDER BY id")
            .fetch_all(pool)
            .await?;
        if !team_ids.is_empty() {
            for (i, &(player_id,)) in player_ids.iter().enumerate() {
                let (team_id,) = team_ids[i % team_ids.len()];
                sqlx::query("INSERT INTO memberships (player_id, team_id) VALUES (?, ?)")
                    .bind(player_id)
                    .bind(team_id)
                    .execute(pool)
                    .await?;
            }
            tracing::info!(count = player_ids.len(), "seeded memberships");
        }
    }

    Ok(())
}

async fn is_empty(pool: &SqlitePool, count_sql: &str) -> Result<bool, ApiError> {
    let (count,): (i64,) = sqlx::query_as(count_sql).fetch_one(pool).await?;
    Ok(count == 0)
}
