use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::handlers::shared::ApiResponse;
use crate::AppState;

/// Sick notes due for the end-of-sick-pay notification today
pub async fn get_reaching_end_of_sick_pay(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    context.require_office()?;

    let sick_notes = state
        .sick_note_service
        .get_sick_notes_reaching_end_of_sick_pay()
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(sick_notes)))
}

/// Notify about and stamp every sick note due for the notification
pub async fn send_end_of_sick_pay_notifications(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    context.require_office()?;

    let notified = state
        .end_of_sick_pay_notification_service
        .send_notifications()
        .await?;
    let message = format!("Sent {} end of sick pay notifications", notified.len());

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(Some(notified), &message)))
}
