use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::models::auth::RefreshToken;
use crate::models::user::{User, UserRole};

pub const ACCESS_TOKEN_TYPE: &str = "access";
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub sub: i64,
    pub role: UserRole,
    /// Token version of the user at issue time
    pub ver: i32,
    pub typ: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub sub: i64,
    pub role: UserRole,
    pub typ: String,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("expected a {expected} token")]
    WrongType { expected: &'static str },
    #[error("token does not belong to the stored record")]
    NotStored,
}

/// A freshly signed refresh token with the metadata that gets persisted
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
}

pub fn encode_token<T: Serialize>(claims: &T, jwt_settings: &JwtSettings) -> Result<String, TokenError> {
    let token = encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
    )?;
    Ok(token)
}

fn decode_claims<T: DeserializeOwned>(token: &str, jwt_settings: &JwtSettings) -> Result<T, TokenError> {
    let data = decode::<T>(
        token,
        &DecodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

pub fn issue_access_token(
    user: &User,
    jwt_settings: &JwtSettings,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let claims = AccessClaims {
        sub: user.id,
        role: user.role,
        ver: user.token_version,
        typ: ACCESS_TOKEN_TYPE.to_string(),
        exp: (now + jwt_settings.access_token_ttl()).timestamp(),
        iat: now.timestamp(),
    };
    encode_token(&claims, jwt_settings)
}

pub fn issue_refresh_token(
    user: &User,
    jwt_settings: &JwtSettings,
    now: DateTime<Utc>,
) -> Result<IssuedRefreshToken, TokenError> {
    let jti = Uuid::new_v4().to_string();
    let expires_at = now + jwt_settings.refresh_token_ttl();
    let claims = RefreshClaims {
        sub: user.id,
        role: user.role,
        typ: REFRESH_TOKEN_TYPE.to_string(),
        jti: jti.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };
    let token = encode_token(&claims, jwt_settings)?;
    Ok(IssuedRefreshToken { token, jti, expires_at })
}

/// Verify signature, expiry and token type of an access token.
/// The token version still has to be compared against storage.
pub fn decode_access_token(token: &str, jwt_settings: &JwtSettings) -> Result<AccessClaims, TokenError> {
    let claims: AccessClaims = decode_claims(token, jwt_settings)?;
    if claims.typ != ACCESS_TOKEN_TYPE {
        return Err(TokenError::WrongType { expected: ACCESS_TOKEN_TYPE });
    }
    Ok(claims)
}

pub fn decode_refresh_token(token: &str, jwt_settings: &JwtSettings) -> Result<RefreshClaims, TokenError> {
    let claims: RefreshClaims = decode_claims(token, jwt_settings)?;
    if claims.typ != REFRESH_TOKEN_TYPE {
        return Err(TokenError::WrongType { expected: REFRESH_TOKEN_TYPE });
    }
    Ok(claims)
}

/// Decode a refresh token and check it is the one `stored` was issued for
pub fn verify_refresh_token(
    token: &str,
    stored: &RefreshToken,
    jwt_settings: &JwtSettings,
) -> Result<RefreshClaims, TokenError> {
    let claims = decode_refresh_token(token, jwt_settings)?;
    if claims.jti != stored.jti || claims.sub != stored.user_id {
        return Err(TokenError::NotStored);
    }
    Ok(claims)
}

/// Refresh tokens are stored and looked up by their SHA-256 hex digest
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
