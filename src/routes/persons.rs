use actix_web::web;

use crate::handlers::{basedata, working_time};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/persons/{person_id}")
            .route("/workingtimes", web::get().to(working_time::get_working_times))
            .route("/workingtimes", web::post().to(working_time::create_working_time))
            .route("/federal-state", web::get().to(working_time::get_federal_state))
            .route("/basedata", web::get().to(basedata::get_basedata))
            .route("/basedata", web::put().to(basedata::update_basedata)),
    );
}
