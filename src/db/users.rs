use sqlx::PgExecutor;

use crate::db::helpers::ListQuery;
use crate::models::user::{User, UserRole};
use crate::utils::query::{FieldKind, FilterField};

pub const USER_LIST: ListQuery = ListQuery {
    select: "SELECT id, username, password_hash, role, token_version, created_at, updated_at \
             FROM users WHERE TRUE",
    count: "SELECT COUNT(*) FROM users WHERE TRUE",
    fields: &[
        FilterField::new("id", "id", FieldKind::Integer),
        FilterField::new("username", "username", FieldKind::Text),
        FilterField::new("role", "role", FieldKind::Text),
        FilterField::new("created_at", "created_at", FieldKind::Timestamp),
    ],
};

pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES ($1, $2, $3)
        RETURNING id, username, password_hash, role, token_version, created_at, updated_at
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, username, password_hash, role, token_version, created_at, updated_at FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_username<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, username, password_hash, role, token_version, created_at, updated_at FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(executor)
        .await
}

/// Current token version, `None` when the user does not exist
pub async fn token_version<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT token_version FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Increment the token version, revoking every access token issued so far
pub async fn bump_token_version<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET token_version = token_version + 1, updated_at = NOW()
        WHERE id = $1
        RETURNING id, username, password_hash, role, token_version, created_at, updated_at
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
