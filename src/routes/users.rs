use actix_web::web;

use crate::handlers::{auth_handler, user_handler};

pub fn init_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/me")
            .route(web::get().to(auth_handler::me)),
    )
    .service(
        web::resource("/users")
            .route(web::get().to(user_handler::get_users)),
    )
    .service(
        web::resource("/users/{id}")
            .route(web::get().to(user_handler::get_user))
            .route(web::delete().to(user_handler::delete_user)),
    );
}
