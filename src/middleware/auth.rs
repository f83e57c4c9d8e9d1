// src/middleware/auth.rs
use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::access::{authorize, ANY_ROLE};
use crate::auth::jwt::{decode_access_token, AccessClaims};
use crate::config::jwt::JwtSettings;
use crate::db::users;
use crate::error::AppError;

/// Extract the bearer token and verify signature, expiry and token type.
pub fn validate_jwt_from_request(req: &ServiceRequest) -> Result<AccessClaims, AppError> {
    let jwt_settings = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| AppError::internal("JWT settings not configured"))?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("No authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

    decode_access_token(token, jwt_settings).map_err(|e| {
        tracing::info!("Rejected access token: {}", e);
        AppError::unauthorized("Invalid or expired token")
    })
}

/// Authenticates every request of the scope it wraps: a valid access token
/// whose version matches the stored one. Role checks per route happen in the
/// handlers through `AuthenticatedUser::require`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let claims = validate_jwt_from_request(&req)?;

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .ok_or_else(|| AppError::internal("Database pool not configured"))?
                .clone();

            let stored_version = users::token_version(pool.get_ref(), claims.sub)
                .await
                .map_err(AppError::from)?;

            let user = authorize(&claims, stored_version, ANY_ROLE)?;
            req.extensions_mut().insert(user);

            service.call(req).await
        })
    }
}
