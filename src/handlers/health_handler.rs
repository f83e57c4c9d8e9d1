use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::models::common::{respond, ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// Liveness plus a round trip to Postgres
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => respond(
            StatusCode::OK,
            "Service is healthy",
            HealthStatus {
                status: "ok",
                database: "ok",
            },
        ),
        Err(e) => {
            tracing::error!("Health check could not reach the database: {:?}", e);
            ApiResponse::<()>::error(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable").into_response()
        }
    }
}
