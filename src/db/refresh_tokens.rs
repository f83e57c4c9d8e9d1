use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use crate::models::auth::RefreshToken;

/// Store the user's only refresh token, replacing any previous one atomically
pub async fn upsert_for_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    token_hash: &str,
    jti: &str,
    expires_at: DateTime<Utc>,
) -> Result<RefreshToken, sqlx::Error> {
    sqlx::query_as::<_, RefreshToken>(
        r#"
        INSERT INTO refresh_tokens (user_id, token_hash, jti, expires_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE
        SET token_hash = EXCLUDED.token_hash,
            jti = EXCLUDED.jti,
            expires_at = EXCLUDED.expires_at,
            created_at = NOW()
        RETURNING id, user_id, token_hash, jti, expires_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(jti)
    .bind(expires_at)
    .fetch_one(executor)
    .await
}

/// Look up a token by digest and lock the row for the rest of the transaction
pub async fn find_by_hash_for_update<'e, E: PgExecutor<'e>>(
    executor: E,
    token_hash: &str,
) -> Result<Option<RefreshToken>, sqlx::Error> {
    sqlx::query_as::<_, RefreshToken>(
        r#"
        SELECT id, user_id, token_hash, jti, expires_at, created_at
        FROM refresh_tokens
        WHERE token_hash = $1
        FOR UPDATE
        "#,
    )
    .bind(token_hash)
    .fetch_optional(executor)
    .await
}

pub async fn delete_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
