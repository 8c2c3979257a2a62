//! Shared test utilities.
//!
//! Helpers for setting up an in-memory database and creating members,
//! competitions, and lotteries with sensible defaults.

use crate::{
    core::{
        competition::{self, NewCompetition},
        lottery::{self, NewLottery},
        member::{self, NewMember},
    },
    entities::{self, CompetitionType},
    errors::Result,
};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a level 0 member.
///
/// # Defaults
/// * `discord_id`: the RSN lowercased, when a snowflake is given
/// * `join_date`: 2024-01-01
pub async fn create_test_member(
    db: &DatabaseConnection,
    rsn: &str,
    discord_id_num: Option<i64>,
) -> Result<entities::member::Model> {
    member::add_member(
        db,
        NewMember {
            rsn: rsn.to_string(),
            discord_id: discord_id_num.map(|_| rsn.to_lowercase()),
            discord_id_num,
            membership_level: 0,
            join_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        },
    )
    .await
}

/// Creates a week-long competition starting 2025-06-01 00:00.
pub async fn create_test_competition(
    db: &DatabaseConnection,
    name: &str,
    competition_type: CompetitionType,
) -> Result<entities::competition::Model> {
    let start_date = NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    competition::add_competition(
        db,
        NewCompetition {
            name: name.to_string(),
            competition_type,
            metric: "overall".to_string(),
            start_date,
            end_date: start_date + chrono::TimeDelta::days(7),
        },
    )
    .await
}

/// Creates a week-long lottery opening at `start` with a 1M gp fee and a cap
/// of 5 entries. `start` doubles as "now", so it is never in the past.
pub async fn create_test_lottery(
    db: &DatabaseConnection,
    start: NaiveDateTime,
) -> Result<entities::lottery::Model> {
    lottery::create_lottery(
        db,
        NewLottery {
            start_date: start,
            duration_days: 7,
            entry_fee: 1_000_000,
            max_entries: 5,
        },
        start,
    )
    .await
}
