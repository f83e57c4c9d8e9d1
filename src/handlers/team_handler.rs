use actix_web::{http::StatusCode, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::access::{AuthenticatedUser, ADMIN_ONLY, ANY_ROLE};
use crate::error::AppError;
use crate::models::common::{respond, ApiResponse};
use crate::models::team::{CreateTeamRequest, UpdateTeamRequest};
use crate::services::TeamService;
use crate::utils::query::QueryParams;

pub async fn get_teams(
    user: AuthenticatedUser,
    query: web::Query<Vec<(String, String)>>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let params = QueryParams::from_pairs(query.into_inner())?;
    let page = TeamService::new(pool.get_ref().clone()).list(&params).await?;
    Ok(respond(StatusCode::OK, "Teams retrieved", page))
}

pub async fn get_team(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let team = TeamService::new(pool.get_ref().clone()).get(path.into_inner()).await?;
    Ok(respond(StatusCode::OK, "Team retrieved", team))
}

pub async fn create_team(
    user: AuthenticatedUser,
    body: web::Json<CreateTeamRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ADMIN_ONLY)?;
    let team = TeamService::new(pool.get_ref().clone()).create(&body).await?;
    Ok(respond(StatusCode::CREATED, "Team created", team))
}

pub async fn update_team(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateTeamRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ADMIN_ONLY)?;
    let team = TeamService::new(pool.get_ref().clone())
        .update(path.into_inner(), &body)
        .await?;
    Ok(respond(StatusCode::OK, "Team updated", team))
}

pub async fn delete_team(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ADMIN_ONLY)?;
    TeamService::new(pool.get_ref().clone()).delete(path.into_inner()).await?;
    Ok(ApiResponse::success_message(StatusCode::OK, "Team deleted").into_response())
}
