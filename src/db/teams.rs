use sqlx::PgExecutor;

use crate::db::helpers::ListQuery;
use crate::models::team::{CreateTeamRequest, Team, UpdateTeamRequest};
use crate::utils::query::{FieldKind, FilterField};

pub const TEAM_LIST: ListQuery = ListQuery {
    select: "SELECT id, name, logo_url, year_founded, address, city, created_at, updated_at, deleted_at \
             FROM teams WHERE deleted_at IS NULL",
    count: "SELECT COUNT(*) FROM teams WHERE deleted_at IS NULL",
    fields: &[
        FilterField::new("id", "id", FieldKind::Integer),
        FilterField::new("name", "name", FieldKind::Text),
        FilterField::new("city", "city", FieldKind::Text),
        FilterField::new("address", "address", FieldKind::Text),
        FilterField::new("year_founded", "year_founded", FieldKind::Integer),
        FilterField::new("created_at", "created_at", FieldKind::Timestamp),
    ],
};

pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, request: &CreateTeamRequest) -> Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        INSERT INTO teams (name, logo_url, year_founded, address, city)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, logo_url, year_founded, address, city, created_at, updated_at, deleted_at
        "#,
    )
    .bind(request.name.trim())
    .bind(request.logo_url.clone().unwrap_or_default())
    .bind(request.year_founded)
    .bind(request.address.clone().unwrap_or_default())
    .bind(request.city.clone().unwrap_or_default())
    .fetch_one(executor)
    .await
}

/// Apply the present fields of `request`; `None` if the team is missing or deleted
pub async fn update<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    request: &UpdateTeamRequest,
) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        UPDATE teams
        SET name = COALESCE($2, name),
            logo_url = COALESCE($3, logo_url),
            year_founded = COALESCE($4, year_founded),
            address = COALESCE($5, address),
            city = COALESCE($6, city),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING id, name, logo_url, year_founded, address, city, created_at, updated_at, deleted_at
        "#,
    )
    .bind(id)
    .bind(request.name.as_deref().map(str::trim))
    .bind(request.logo_url.as_deref())
    .bind(request.year_founded)
    .bind(request.address.as_deref())
    .bind(request.city.as_deref())
    .fetch_optional(executor)
    .await
}

pub async fn soft_delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE teams SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Team regardless of soft deletion; callers decide what a deleted team means
pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT id, name, logo_url, year_founded, address, city, created_at, updated_at, deleted_at
        FROM teams
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn find_live<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT id, name, logo_url, year_founded, address, city, created_at, updated_at, deleted_at
        FROM teams
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Lock a team row against concurrent soft deletion
pub async fn find_for_share<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT id, name, logo_url, year_founded, address, city, created_at, updated_at, deleted_at
        FROM teams
        WHERE id = $1
        FOR SHARE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn find_by_name<'e, E: PgExecutor<'e>>(executor: E, name: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM teams WHERE name = $1")
        .bind(name.trim())
        .fetch_optional(executor)
        .await
}

pub async fn all_live<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(
        r#"
        SELECT id, name, logo_url, year_founded, address, city, created_at, updated_at, deleted_at
        FROM teams
        WHERE deleted_at IS NULL
        ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}
