use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::access::{AuthenticatedUser, ANY_ROLE, STAFF_OR_ADMIN};
use crate::error::AppError;
use crate::league::goals::GoalService;
use crate::models::common::respond;
use crate::models::goal::CreateGoalRequest;

#[derive(Debug, Deserialize)]
pub struct TopScorersQuery {
    pub limit: Option<i64>,
}

pub async fn add_goal(
    user: AuthenticatedUser,
    body: web::Json<CreateGoalRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(STAFF_OR_ADMIN)?;
    let goal = GoalService::new(pool.get_ref().clone()).add_goal(&body).await?;
    Ok(respond(StatusCode::CREATED, "Goal recorded", goal))
}

pub async fn get_match_goals(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let goals = GoalService::new(pool.get_ref().clone())
        .goals_for_match(path.into_inner())
        .await?;
    Ok(respond(StatusCode::OK, "Goals retrieved", goals))
}

pub async fn get_top_scorers(
    user: AuthenticatedUser,
    query: web::Query<TopScorersQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let scorers = GoalService::new(pool.get_ref().clone())
        .top_scorers(query.limit)
        .await?;
    Ok(respond(StatusCode::OK, "Top scorers retrieved", scorers))
}
