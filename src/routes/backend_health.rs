use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;

use crate::handlers::health_handler::health_check;

#[get("/health")]
async fn backend_health(pool: web::Data<PgPool>) -> HttpResponse {
    health_check(pool).await
}
