use sqlx::PgExecutor;

use crate::db::helpers::ListQuery;
use crate::models::player::{Player, PlayerWithTeam, Position};
use crate::utils::query::{FieldKind, FilterField};

pub const PLAYER_LIST: ListQuery = ListQuery {
    select: "SELECT p.id, p.team_id, t.name AS team_name, p.name, p.height_cm, p.weight_kg, \
             p.position, p.jersey_number \
             FROM players p JOIN teams t ON t.id = p.team_id \
             WHERE p.deleted_at IS NULL",
    count: "SELECT COUNT(*) FROM players p JOIN teams t ON t.id = p.team_id \
            WHERE p.deleted_at IS NULL",
    fields: &[
        FilterField::new("id", "p.id", FieldKind::Integer),
        FilterField::new("team_id", "p.team_id", FieldKind::Integer),
        FilterField::new("team_name", "t.name", FieldKind::Text),
        FilterField::new("name", "p.name", FieldKind::Text),
        FilterField::new("position", "p.position", FieldKind::Text),
        FilterField::new("jersey_number", "p.jersey_number", FieldKind::Integer),
        FilterField::new("height", "p.height_cm", FieldKind::Integer),
        FilterField::new("weight", "p.weight_kg", FieldKind::Integer),
        FilterField::new("created_at", "p.created_at", FieldKind::Timestamp),
    ],
};

pub struct NewPlayer<'a> {
    pub team_id: i64,
    pub name: &'a str,
    pub height_cm: i32,
    pub weight_kg: i32,
    pub position: Position,
    pub jersey_number: i32,
}

pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, player: &NewPlayer<'_>) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        INSERT INTO players (team_id, name, height_cm, weight_kg, position, jersey_number)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, team_id, name, height_cm, weight_kg, position, jersey_number,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(player.team_id)
    .bind(player.name.trim())
    .bind(player.height_cm)
    .bind(player.weight_kg)
    .bind(player.position)
    .bind(player.jersey_number)
    .fetch_one(executor)
    .await
}

pub async fn find_live<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        SELECT id, team_id, name, height_cm, weight_kg, position, jersey_number,
               created_at, updated_at, deleted_at
        FROM players
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Lock the player row for the rest of the transaction
pub async fn find_live_for_update<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        SELECT id, team_id, name, height_cm, weight_kg, position, jersey_number,
               created_at, updated_at, deleted_at
        FROM players
        WHERE id = $1 AND deleted_at IS NULL
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn find_with_team<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<PlayerWithTeam>, sqlx::Error> {
    sqlx::query_as::<_, PlayerWithTeam>(
        r#"
        SELECT p.id, p.team_id, t.name AS team_name, p.name, p.height_cm, p.weight_kg,
               p.position, p.jersey_number
        FROM players p
        JOIN teams t ON t.id = p.team_id
        WHERE p.id = $1 AND p.deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Id of the current player wearing `jersey_number` in the team, other than `exclude_player_id`
pub async fn jersey_holder<'e, E: PgExecutor<'e>>(
    executor: E,
    team_id: i64,
    jersey_number: i32,
    exclude_player_id: Option<i64>,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM players
        WHERE team_id = $1 AND jersey_number = $2 AND deleted_at IS NULL
          AND ($3::BIGINT IS NULL OR id <> $3)
        LIMIT 1
        "#,
    )
    .bind(team_id)
    .bind(jersey_number)
    .bind(exclude_player_id)
    .fetch_optional(executor)
    .await
}

pub struct PlayerChanges<'a> {
    pub name: Option<&'a str>,
    pub height_cm: Option<i32>,
    pub weight_kg: Option<i32>,
    pub position: Option<Position>,
    pub jersey_number: Option<i32>,
}

pub async fn update<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    changes: &PlayerChanges<'_>,
) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        UPDATE players
        SET name = COALESCE($2, name),
            height_cm = COALESCE($3, height_cm),
            weight_kg = COALESCE($4, weight_kg),
            position = COALESCE($5, position),
            jersey_number = COALESCE($6, jersey_number),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING id, team_id, name, height_cm, weight_kg, position, jersey_number,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(changes.name.map(str::trim))
    .bind(changes.height_cm)
    .bind(changes.weight_kg)
    .bind(changes.position)
    .bind(changes.jersey_number)
    .fetch_optional(executor)
    .await
}

/// Reassign team and jersey in one statement
pub async fn move_to_team<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    team_id: i64,
    jersey_number: i32,
) -> Result<Player, sqlx::Error> {
    sqlx::query_as::<_, Player>(
        r#"
        UPDATE players
        SET team_id = $2, jersey_number = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING id, team_id, name, height_cm, weight_kg, position, jersey_number,
                  created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(team_id)
    .bind(jersey_number)
    .fetch_one(executor)
    .await
}

pub async fn soft_delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE players SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}
