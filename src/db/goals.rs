use sqlx::PgExecutor;

use crate::models::goal::{Goal, GoalDetail, TopScorer};

pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    match_id: i64,
    team_id: i64,
    scorer_player_id: i64,
    minute: &str,
) -> Result<Goal, sqlx::Error> {
    sqlx::query_as::<_, Goal>(
        r#"
        INSERT INTO goals (match_id, team_id, scorer_player_id, minute)
        VALUES ($1, $2, $3, $4)
        RETURNING id, match_id, team_id, scorer_player_id, minute, created_at
        "#,
    )
    .bind(match_id)
    .bind(team_id)
    .bind(scorer_player_id)
    .bind(minute)
    .fetch_one(executor)
    .await
}

/// Goals of one match with team and scorer, in recording order
pub async fn details_for_match<'e, E: PgExecutor<'e>>(
    executor: E,
    match_id: i64,
) -> Result<Vec<GoalDetail>, sqlx::Error> {
    sqlx::query_as::<_, GoalDetail>(
        r#"
        SELECT g.id, g.match_id, g.team_id, t.name AS team_name,
               g.scorer_player_id, p.name AS scorer_name,
               p.height_cm AS scorer_height_cm, p.weight_kg AS scorer_weight_kg,
               p.position AS scorer_position, p.jersey_number AS scorer_jersey_number,
               g.minute
        FROM goals g
        JOIN teams t ON t.id = g.team_id
        JOIN players p ON p.id = g.scorer_player_id
        WHERE g.match_id = $1
        ORDER BY g.id
        "#,
    )
    .bind(match_id)
    .fetch_all(executor)
    .await
}

/// Goals of all completed matches, as `(match_id, team_id)` pairs
pub async fn team_goals_for_matches<'e, E: PgExecutor<'e>>(
    executor: E,
    match_ids: &[i64],
) -> Result<Vec<(i64, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (i64, i64)>(
        "SELECT match_id, team_id FROM goals WHERE match_id = ANY($1) ORDER BY id",
    )
    .bind(match_ids.to_vec())
    .fetch_all(executor)
    .await
}

/// Goals per scorer across every match; ties go to the lowest player id
pub async fn top_scorers<'e, E: PgExecutor<'e>>(executor: E, limit: i64) -> Result<Vec<TopScorer>, sqlx::Error> {
    sqlx::query_as::<_, TopScorer>(
        r#"
        SELECT p.id AS player_id, p.name AS player_name,
               t.id AS team_id, t.name AS team_name,
               COUNT(g.id) AS goals
        FROM goals g
        JOIN players p ON p.id = g.scorer_player_id
        JOIN teams t ON t.id = p.team_id
        GROUP BY p.id, p.name, t.id, t.name
        ORDER BY goals DESC, p.id ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(executor)
    .await
}
