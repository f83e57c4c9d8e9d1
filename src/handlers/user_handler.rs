use actix_web::{http::StatusCode, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::access::{AuthenticatedUser, ADMIN_ONLY, ANY_ROLE};
use crate::error::AppError;
use crate::models::common::{respond, ApiResponse};
use crate::services::UserService;
use crate::utils::query::QueryParams;

pub async fn get_users(
    user: AuthenticatedUser,
    query: web::Query<Vec<(String, String)>>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ADMIN_ONLY)?;
    let params = QueryParams::from_pairs(query.into_inner())?;
    let page = UserService::new(pool.get_ref().clone()).list(&params).await?;
    Ok(respond(StatusCode::OK, "Users retrieved", page))
}

pub async fn get_user(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let found = UserService::new(pool.get_ref().clone()).get(path.into_inner()).await?;
    Ok(respond(StatusCode::OK, "User retrieved", found))
}

#[tracing::instrument(name = "Delete user request", skip(user, pool), fields(admin_id = %user.user_id))]
pub async fn delete_user(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ADMIN_ONLY)?;
    UserService::new(pool.get_ref().clone())
        .delete(user.user_id, path.into_inner())
        .await?;
    Ok(ApiResponse::success_message(StatusCode::OK, "User deleted").into_response())
}
