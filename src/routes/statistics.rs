use actix_web::web;

use crate::handlers::statistics;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/statistics")
            .route(
                "/applications",
                web::get().to(statistics::get_application_statistics),
            )
            .route(
                "/applications/download",
                web::get().to(statistics::download_application_statistics),
            )
            .route("/sickdays", web::get().to(statistics::get_sick_days_statistics))
            .route(
                "/sickdays/download",
                web::get().to(statistics::download_sick_days_statistics),
            ),
    );
}
