use actix_web::{http::StatusCode, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::access::{AuthenticatedUser, ANY_ROLE, STAFF_OR_ADMIN};
use crate::error::AppError;
use crate::league::results::MatchResultService;
use crate::league::standings::StandingsService;
use crate::models::common::respond;
use crate::models::goal::SubmitResultRequest;
use crate::models::matches::{CreateMatchRequest, UpdateMatchRequest};
use crate::services::MatchService;
use crate::utils::query::QueryParams;

pub async fn get_matches(
    user: AuthenticatedUser,
    query: web::Query<Vec<(String, String)>>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let params = QueryParams::from_pairs(query.into_inner())?;
    let page = MatchService::new(pool.get_ref().clone()).list(&params).await?;
    Ok(respond(StatusCode::OK, "Matches retrieved", page))
}

pub async fn get_match(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let game = MatchService::new(pool.get_ref().clone()).get(path.into_inner()).await?;
    Ok(respond(StatusCode::OK, "Match retrieved", game))
}

pub async fn create_match(
    user: AuthenticatedUser,
    body: web::Json<CreateMatchRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(STAFF_OR_ADMIN)?;
    let game = MatchService::new(pool.get_ref().clone()).create(&body).await?;
    Ok(respond(StatusCode::CREATED, "Match created", game))
}

pub async fn update_match(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateMatchRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(STAFF_OR_ADMIN)?;
    let game = MatchService::new(pool.get_ref().clone())
        .update(path.into_inner(), &body)
        .await?;
    Ok(respond(StatusCode::OK, "Match updated", game))
}

/// An empty body only computes the result from the goals already recorded.
fn parse_submission(body: &[u8]) -> Result<SubmitResultRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SubmitResultRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::validation(format!("Invalid result body: {}", e)))
}

#[tracing::instrument(name = "Submit match result", skip(user, body, pool), fields(user_id = %user.user_id))]
pub async fn submit_match_result(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Bytes,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(STAFF_OR_ADMIN)?;
    let submission = parse_submission(&body)?;
    let service = MatchResultService::new(pool.get_ref().clone());
    let match_id = path.into_inner();
    let result = if submission.goals.is_empty() {
        service.process_result(match_id).await?
    } else {
        service.submit_result(match_id, &submission).await?
    };
    Ok(respond(StatusCode::OK, "Match result processed", result))
}

pub async fn get_match_report(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let report = MatchResultService::new(pool.get_ref().clone())
        .report(path.into_inner())
        .await?;
    Ok(respond(StatusCode::OK, "Match report retrieved", report))
}

pub async fn get_league_standing(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let table = StandingsService::new(pool.get_ref().clone()).league_standing().await?;
    Ok(respond(StatusCode::OK, "League standing retrieved", table))
}
