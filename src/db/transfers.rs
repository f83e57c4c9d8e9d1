use sqlx::PgExecutor;

use crate::models::player::PlayerTransfer;

pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    player_id: i64,
    old_team_id: i64,
    new_team_id: i64,
    jersey_number: i32,
) -> Result<PlayerTransfer, sqlx::Error> {
    sqlx::query_as::<_, PlayerTransfer>(
        r#"
        INSERT INTO player_transfers (player_id, old_team_id, new_team_id, jersey_number)
        VALUES ($1, $2, $3, $4)
        RETURNING id, player_id, old_team_id, new_team_id, jersey_number, created_at
        "#,
    )
    .bind(player_id)
    .bind(old_team_id)
    .bind(new_team_id)
    .bind(jersey_number)
    .fetch_one(executor)
    .await
}

/// Transfer history of a player, oldest first
pub async fn for_player<'e, E: PgExecutor<'e>>(
    executor: E,
    player_id: i64,
) -> Result<Vec<PlayerTransfer>, sqlx::Error> {
    sqlx::query_as::<_, PlayerTransfer>(
        r#"
        SELECT id, player_id, old_team_id, new_team_id, jersey_number, created_at
        FROM player_transfers
        WHERE player_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(player_id)
    .fetch_all(executor)
    .await
}
