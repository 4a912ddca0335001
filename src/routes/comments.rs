use actix_web::web;

use crate::handlers::comments;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/applications/{application_id}/comments")
            .route(web::get().to(comments::get_application_comments))
            .route(web::post().to(comments::create_application_comment)),
    )
    .service(
        web::resource("/overtimes/{overtime_id}/comments")
            .route(web::get().to(comments::get_overtime_comments))
            .route(web::post().to(comments::create_overtime_comment)),
    );
}
