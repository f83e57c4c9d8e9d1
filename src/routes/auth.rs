use actix_web::{post, web, HttpResponse};
use sqlx::PgPool;

use crate::config::jwt::JwtSettings;
use crate::error::AppError;
use crate::handlers::auth_handler::{login_user, logout_user, refresh_tokens, register_user};
use crate::models::auth::{LoginRequest, RefreshRequest};
use crate::models::user::RegistrationRequest;

#[post("/register")]
async fn register(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    register_user(user_form, pool, jwt_settings).await
}

#[post("/login")]
async fn login(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    login_user(login_form, pool, jwt_settings).await
}

#[post("/refresh")]
async fn refresh(
    refresh_form: web::Json<RefreshRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    refresh_tokens(refresh_form, pool, jwt_settings).await
}

#[post("/logout")]
async fn logout(
    refresh_form: web::Json<RefreshRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    logout_user(refresh_form, pool, jwt_settings).await
}
