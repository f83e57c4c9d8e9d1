use actix_web::{http::StatusCode, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::access::{AuthenticatedUser, ADMIN_ONLY, ANY_ROLE, STAFF_OR_ADMIN};
use crate::error::AppError;
use crate::models::common::{respond, ApiResponse};
use crate::models::player::{CreatePlayerRequest, TransferRequest, UpdatePlayerRequest};
use crate::services::PlayerService;
use crate::utils::query::QueryParams;

pub async fn get_players(
    user: AuthenticatedUser,
    query: web::Query<Vec<(String, String)>>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let params = QueryParams::from_pairs(query.into_inner())?;
    let page = PlayerService::new(pool.get_ref().clone()).list(&params).await?;
    Ok(respond(StatusCode::OK, "Players retrieved", page))
}

pub async fn get_players_by_team(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    query: web::Query<Vec<(String, String)>>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let params = QueryParams::from_pairs(query.into_inner())?;
    let page = PlayerService::new(pool.get_ref().clone())
        .list_by_team(path.into_inner(), &params)
        .await?;
    Ok(respond(StatusCode::OK, "Players retrieved", page))
}

pub async fn get_player(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let player = PlayerService::new(pool.get_ref().clone()).get(path.into_inner()).await?;
    Ok(respond(StatusCode::OK, "Player retrieved", player))
}

pub async fn create_player(
    user: AuthenticatedUser,
    body: web::Json<CreatePlayerRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(STAFF_OR_ADMIN)?;
    let player = PlayerService::new(pool.get_ref().clone()).create(&body).await?;
    Ok(respond(StatusCode::CREATED, "Player created", player))
}

pub async fn update_player(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdatePlayerRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(STAFF_OR_ADMIN)?;
    let player = PlayerService::new(pool.get_ref().clone())
        .update(path.into_inner(), &body)
        .await?;
    Ok(respond(StatusCode::OK, "Player updated", player))
}

pub async fn delete_player(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ADMIN_ONLY)?;
    PlayerService::new(pool.get_ref().clone()).delete(path.into_inner()).await?;
    Ok(ApiResponse::success_message(StatusCode::OK, "Player deleted").into_response())
}

pub async fn transfer_player(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<TransferRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(STAFF_OR_ADMIN)?;
    let transfer = PlayerService::new(pool.get_ref().clone())
        .transfer(path.into_inner(), &body)
        .await?;
    Ok(respond(StatusCode::OK, "Player transferred", transfer))
}

pub async fn get_player_transfers(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require(ANY_ROLE)?;
    let history = PlayerService::new(pool.get_ref().clone())
        .transfers(path.into_inner())
        .await?;
    Ok(respond(StatusCode::OK, "Transfer history retrieved", history))
}
