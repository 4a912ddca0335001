use actix_web::web;

use crate::handlers::health;

pub mod comments;
pub mod persons;
pub mod settings;
pub mod sick_notes;
pub mod statistics;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health).service(
        web::scope("/api/v1")
            .configure(persons::configure)
            .configure(statistics::configure)
            .configure(sick_notes::configure)
            .configure(settings::configure)
            .configure(comments::configure),
    );
}
