use actix_web::{http::StatusCode, web, HttpResponse};
use sqlx::PgPool;

use crate::auth::access::AuthenticatedUser;
use crate::config::jwt::JwtSettings;
use crate::error::AppError;
use crate::models::auth::{LoginRequest, RefreshRequest};
use crate::models::common::{respond, ApiResponse};
use crate::models::user::RegistrationRequest;
use crate::services::AuthService;

#[tracing::instrument(
    name = "Register request",
    skip(body, pool, jwt_settings),
    fields(username = %body.username)
)]
pub async fn register_user(
    body: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let user = AuthService::new(pool.get_ref().clone(), &jwt_settings)
        .register(&body)
        .await?;
    Ok(respond(StatusCode::CREATED, "User registered", user))
}

#[tracing::instrument(name = "Login request", skip(body, pool, jwt_settings), fields(username = %body.username))]
pub async fn login_user(
    body: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let login = AuthService::new(pool.get_ref().clone(), &jwt_settings)
        .login(&body)
        .await?;
    Ok(respond(StatusCode::OK, "Login successful", login))
}

pub async fn refresh_tokens(
    body: web::Json<RefreshRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let refreshed = AuthService::new(pool.get_ref().clone(), &jwt_settings)
        .refresh(&body.refresh_token)
        .await?;
    Ok(respond(StatusCode::OK, "Tokens refreshed", refreshed))
}

pub async fn logout_user(
    body: web::Json<RefreshRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    AuthService::new(pool.get_ref().clone(), &jwt_settings)
        .logout(&body.refresh_token)
        .await?;
    Ok(ApiResponse::success_message(StatusCode::OK, "Logged out").into_response())
}

pub async fn me(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let profile = AuthService::new(pool.get_ref().clone(), &jwt_settings)
        .me(user.user_id)
        .await?;
    Ok(respond(StatusCode::OK, "Current user", profile))
}
