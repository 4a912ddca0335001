use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::database::models::Settings;
use crate::handlers::shared::ApiResponse;
use crate::AppState;

pub async fn get_settings(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    context.require_office()?;

    let settings = state.settings_service.get_settings().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(settings)))
}

pub async fn update_settings(
    req: HttpRequest,
    state: web::Data<AppState>,
    input: web::Json<Settings>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    context.require_office()?;

    let settings = state.settings_service.save(input.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(settings),
        "Settings updated",
    )))
}
