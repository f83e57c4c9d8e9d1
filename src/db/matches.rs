use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::db::helpers::ListQuery;
use crate::models::matches::{Match, MatchStatus};
use crate::utils::query::{FieldKind, FilterField};

pub const MATCH_LIST: ListQuery = ListQuery {
    select: "SELECT m.id, m.match_date_time, m.status, \
             m.home_team_id, ht.name AS home_team_name, \
             m.away_team_id, awt.name AS away_team_name, \
             (SELECT COUNT(*) FROM goals g WHERE g.match_id = m.id AND g.team_id = m.home_team_id) AS home_score, \
             (SELECT COUNT(*) FROM goals g WHERE g.match_id = m.id AND g.team_id = m.away_team_id) AS away_score \
             FROM matches m \
             JOIN teams ht ON ht.id = m.home_team_id \
             JOIN teams awt ON awt.id = m.away_team_id \
             WHERE TRUE",
    count: "SELECT COUNT(*) FROM matches m \
            JOIN teams ht ON ht.id = m.home_team_id \
            JOIN teams awt ON awt.id = m.away_team_id \
            WHERE TRUE",
    fields: &[
        FilterField::new("id", "m.id", FieldKind::Integer),
        FilterField::new("status", "m.status", FieldKind::Text),
        FilterField::new("home_team_id", "m.home_team_id", FieldKind::Integer),
        FilterField::new("away_team_id", "m.away_team_id", FieldKind::Integer),
        FilterField::new("home_team_name", "ht.name", FieldKind::Text),
        FilterField::new("away_team_name", "awt.name", FieldKind::Text),
        FilterField::new("match_date_time", "m.match_date_time", FieldKind::Timestamp),
        FilterField::new("created_at", "m.created_at", FieldKind::Timestamp),
    ],
};

pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    match_date_time: DateTime<Utc>,
    home_team_id: i64,
    away_team_id: i64,
) -> Result<Match, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"
        INSERT INTO matches (match_date_time, home_team_id, away_team_id, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, match_date_time, home_team_id, away_team_id, status, created_at, updated_at
        "#,
    )
    .bind(match_date_time)
    .bind(home_team_id)
    .bind(away_team_id)
    .bind(MatchStatus::Scheduled)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"
        SELECT id, match_date_time, home_team_id, away_team_id, status, created_at, updated_at
        FROM matches
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Exclusive per-match lock serializing result processing and status changes
pub async fn find_for_update<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"
        SELECT id, match_date_time, home_team_id, away_team_id, status, created_at, updated_at
        FROM matches
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Shared lock: goal inserts may run side by side but not alongside result processing
pub async fn find_for_share<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Match>, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"
        SELECT id, match_date_time, home_team_id, away_team_id, status, created_at, updated_at
        FROM matches
        WHERE id = $1
        FOR SHARE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Whether either team already plays a non-cancelled match at `match_date_time`
pub async fn has_schedule_conflict<'e, E: PgExecutor<'e>>(
    executor: E,
    team_ids: [i64; 2],
    match_date_time: DateTime<Utc>,
    exclude_match_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM matches
            WHERE (home_team_id = ANY($1) OR away_team_id = ANY($1))
              AND match_date_time = $2
              AND status <> $3
              AND ($4::BIGINT IS NULL OR id <> $4)
        )
        "#,
    )
    .bind(team_ids.to_vec())
    .bind(match_date_time)
    .bind(MatchStatus::Cancelled)
    .bind(exclude_match_id)
    .fetch_one(executor)
    .await
}

pub async fn update<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    status: MatchStatus,
    match_date_time: DateTime<Utc>,
) -> Result<Match, sqlx::Error> {
    sqlx::query_as::<_, Match>(
        r#"
        UPDATE matches
        SET status = $2, match_date_time = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING id, match_date_time, home_team_id, away_team_id, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(match_date_time)
    .fetch_one(executor)
    .await
}

pub async fn set_status<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    status: MatchStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE matches SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}

/// Matches that count towards the league table
pub async fn completed<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Match>, sqlx::Error> {
    let statuses: Vec<&str> = MatchStatus::COMPLETED.iter().map(|s| s.as_str()).collect();
    sqlx::query_as::<_, Match>(
        r#"
        SELECT id, match_date_time, home_team_id, away_team_id, status, created_at, updated_at
        FROM matches
        WHERE status = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(statuses)
    .fetch_all(executor)
    .await
}

/// Matches the team won at home
pub async fn count_home_wins<'e, E: PgExecutor<'e>>(executor: E, team_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM matches WHERE home_team_id = $1 AND status = $2")
        .bind(team_id)
        .bind(MatchStatus::HomeWin)
        .fetch_one(executor)
        .await
}

/// Matches the team won away
pub async fn count_away_wins<'e, E: PgExecutor<'e>>(executor: E, team_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM matches WHERE away_team_id = $1 AND status = $2")
        .bind(team_id)
        .bind(MatchStatus::AwayWin)
        .fetch_one(executor)
        .await
}
