use sqlx::PgPool;

use crate::db::helpers::{fetch_page, require_record};
use crate::db::users::{self, USER_LIST};
use crate::error::{AppError, AppResult};
use crate::models::common::PaginatedResponse;
use crate::models::user::{User, UserResponse};
use crate::utils::query::QueryParams;

#[derive(Debug)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, params: &QueryParams) -> AppResult<PaginatedResponse<UserResponse>> {
        let page = fetch_page::<User>(&self.pool, &USER_LIST, params).await?;
        Ok(page.map(UserResponse::from))
    }

    pub async fn get(&self, id: i64) -> AppResult<UserResponse> {
        let user = require_record(users::find_by_id(&self.pool, id).await, "User not found")?;
        Ok(UserResponse::from(user))
    }

    /// Delete a user and, through the foreign key, their refresh token
    #[tracing::instrument(name = "Delete user", skip(self))]
    pub async fn delete(&self, requester_id: i64, id: i64) -> AppResult<()> {
        if requester_id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        if !users::delete(&self.pool, id).await? {
            return Err(AppError::not_found("User not found"));
        }
        tracing::info!("User {} deleted by {}", id, requester_id);
        Ok(())
    }
}
