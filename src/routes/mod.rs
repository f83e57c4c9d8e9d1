use actix_web::{error, web, HttpRequest, HttpResponse};

pub mod auth;
pub mod backend_health;
pub mod league;
pub mod users;

use crate::error::AppError;
use crate::middleware::auth::AuthMiddleware;

fn bad_request(err: impl std::fmt::Display) -> error::Error {
    AppError::validation(err.to_string()).into()
}

/// Extractor failures answer with the same envelope as handler errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| bad_request(err))
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| bad_request(err))
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req: &HttpRequest| bad_request(err))
}

pub async fn route_not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found("Route not found"))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Public: credentials and token rotation
    cfg.service(
        web::scope("/api/v1/auth")
            .service(auth::register)
            .service(auth::login)
            .service(auth::refresh)
            .service(auth::logout),
    );
    // Everything else requires a live access token; roles are checked per handler
    cfg.service(
        web::scope("/api/v1")
            .wrap(AuthMiddleware)
            .configure(users::init_user_routes)
            .configure(league::init_league_routes),
    );
}
