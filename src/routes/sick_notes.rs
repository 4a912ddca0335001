use actix_web::web;

use crate::handlers::sick_notes;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sicknotes")
            .route(
                "/end-of-sick-pay",
                web::get().to(sick_notes::get_reaching_end_of_sick_pay),
            )
            .route(
                "/end-of-sick-pay/notifications",
                web::post().to(sick_notes::send_end_of_sick_pay_notifications),
            ),
    );
}
