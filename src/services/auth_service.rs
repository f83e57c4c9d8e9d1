use chrono::Utc;
use secrecy::ExposeSecret;
use sqlx::{PgConnection, PgPool};

use crate::auth::jwt::{
    hash_refresh_token, issue_access_token, issue_refresh_token, verify_refresh_token, TokenError,
};
use crate::config::jwt::JwtSettings;
use crate::db::helpers::require_record;
use crate::db::{refresh_tokens, users};
use crate::error::{AppError, AppResult};
use crate::models::auth::{LoginRequest, LoginResponse, TokenPair};
use crate::models::user::{RegistrationRequest, User, UserResponse, UserRole};
use crate::utils::password::{hash_password, verify_password};

pub const MAX_USERNAME_LENGTH: usize = 100;

/// Credential and token service: registration, login and the rotating
/// refresh-token flow. Every refresh or logout bumps the user's token
/// version, which revokes all access tokens issued before it.
pub struct AuthService<'a> {
    pool: PgPool,
    jwt_settings: &'a JwtSettings,
}

pub fn validate_registration(request: &RegistrationRequest) -> Result<UserRole, AppError> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(AppError::validation(format!(
            "Username cannot exceed {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    if request.password.expose_secret().is_empty() {
        return Err(AppError::validation("Password is required"));
    }
    request
        .role
        .parse::<UserRole>()
        .map_err(|e| AppError::validation(e.to_string()))
}

impl<'a> AuthService<'a> {
    pub fn new(pool: PgPool, jwt_settings: &'a JwtSettings) -> Self {
        Self { pool, jwt_settings }
    }

    #[tracing::instrument(
        name = "Register user",
        skip(self, request),
        fields(username = %request.username, role = %request.role)
    )]
    pub async fn register(&self, request: &RegistrationRequest) -> AppResult<UserResponse> {
        let role = validate_registration(request)?;
        let username = request.username.trim();

        if users::find_by_username(&self.pool, username).await?.is_some() {
            return Err(AppError::conflict("Username is already taken"));
        }

        let password_hash = hash_password(request.password.expose_secret()).map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            AppError::internal("Failed to process password")
        })?;

        let user = users::insert(&self.pool, username, &password_hash, role)
            .await
            .map_err(|e| AppError::from_unique_violation(e, "Username is already taken"))?;

        tracing::info!("Registered user {} with role {}", user.id, user.role);
        Ok(UserResponse::from(user))
    }

    #[tracing::instrument(name = "Login", skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        let user = require_record(
            users::find_by_username(&self.pool, request.username.trim()).await,
            "User not found",
        )?;

        if !verify_password(request.password.expose_secret(), &user.password_hash) {
            tracing::info!("Wrong password for user {}", user.id);
            return Err(AppError::validation("Invalid password"));
        }

        let mut tx = self.pool.begin().await?;
        let tokens = self.issue_tokens(&mut tx, &user).await?;
        tx.commit().await?;

        tracing::info!("User {} logged in", user.id);
        Ok(LoginResponse::new(tokens, UserResponse::from(user)))
    }

    /// Exchange a refresh token for a new pair. The presented token is
    /// consumed whatever the outcome.
    #[tracing::instrument(name = "Refresh tokens", skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<LoginResponse> {
        let mut tx = self.pool.begin().await?;

        let stored = refresh_tokens::find_by_hash_for_update(&mut *tx, &hash_refresh_token(refresh_token))
            .await?
            .ok_or_else(|| AppError::unauthorized("Unknown refresh token"))?;

        refresh_tokens::delete_by_id(&mut *tx, stored.id).await?;

        if stored.is_expired_at(Utc::now()) {
            tx.commit().await?;
            tracing::info!("Expired refresh token presented for user {}", stored.user_id);
            return Err(AppError::unauthorized("Refresh token has expired"));
        }

        if let Err(e) = verify_refresh_token(refresh_token, &stored, self.jwt_settings) {
            tx.commit().await?;
            tracing::warn!("Rejected refresh token for user {}: {}", stored.user_id, e);
            return Err(AppError::unauthorized("Invalid refresh token"));
        }

        let user = require_record(
            users::bump_token_version(&mut *tx, stored.user_id).await,
            "User not found",
        )?;
        let tokens = self.issue_tokens(&mut tx, &user).await?;
        tx.commit().await?;

        tracing::info!("Rotated tokens for user {} (version {})", user.id, user.token_version);
        Ok(LoginResponse::new(tokens, UserResponse::from(user)))
    }

    #[tracing::instrument(name = "Logout", skip(self, refresh_token))]
    pub async fn logout(&self, refresh_token: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let stored = refresh_tokens::find_by_hash_for_update(&mut *tx, &hash_refresh_token(refresh_token))
            .await?
            .ok_or_else(|| AppError::unauthorized("Unknown refresh token"))?;

        verify_refresh_token(refresh_token, &stored, self.jwt_settings).map_err(|e| {
            tracing::warn!("Rejected refresh token for user {}: {}", stored.user_id, e);
            AppError::unauthorized("Invalid refresh token")
        })?;

        require_record(
            users::bump_token_version(&mut *tx, stored.user_id).await,
            "User not found",
        )?;
        refresh_tokens::delete_by_id(&mut *tx, stored.id).await?;
        tx.commit().await?;

        tracing::info!("User {} logged out", stored.user_id);
        Ok(())
    }

    #[tracing::instrument(name = "Current user", skip(self))]
    pub async fn me(&self, user_id: i64) -> AppResult<UserResponse> {
        let user = require_record(users::find_by_id(&self.pool, user_id).await, "User not found")?;
        Ok(UserResponse::from(user))
    }

    /// Replace the user's refresh token with a new one and sign a new pair
    async fn issue_tokens(&self, conn: &mut PgConnection, user: &User) -> AppResult<TokenPair> {
        let now = Utc::now();
        let token_failure = |e: TokenError| {
            tracing::error!("Failed to sign token: {:?}", e);
            AppError::internal("Failed to issue tokens")
        };

        let access_token = issue_access_token(user, self.jwt_settings, now).map_err(token_failure)?;
        let refresh = issue_refresh_token(user, self.jwt_settings, now).map_err(token_failure)?;

        refresh_tokens::upsert_for_user(
            &mut *conn,
            user.id,
            &hash_refresh_token(&refresh.token),
            &refresh.jti,
            refresh.expires_at,
        )
        .await?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh.token,
        })
    }
}
