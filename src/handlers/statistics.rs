use actix_web::{http::header, web, HttpRequest, HttpResponse, Result};

use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, PeriodQuery};
use crate::middleware::RequestIdExt;
use crate::services::csv_export::to_csv_bytes;
use crate::AppState;

fn csv_attachment(file_name: &str, content: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(content)
}

/// Leave and sick days of every person the signed-in person may see
pub async fn get_application_statistics(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let period = query.to_filter_period(state.clock.today())?;

    let statistics = state
        .application_statistics_service
        .get_statistics(&context.person, &period)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(statistics)))
}

pub async fn download_application_statistics(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let period = query.to_filter_period(state.clock.today())?;

    let vacation_types = state
        .application_statistics_service
        .get_active_vacation_types()
        .await?;
    let statistics = state
        .application_statistics_service
        .get_statistics(&context.person, &period)
        .await?;

    let export = &state.application_statistics_csv_export;
    let content = to_csv_bytes(|writer| export.write(&period, &statistics, &vacation_types, writer))
        .map_err(|err| {
            log::error!(
                "[{}] Error exporting application statistics: {}",
                req.correlation_id().unwrap_or_default(),
                err
            );
            AppError::from(err)
        })?;

    Ok(csv_attachment(&export.file_name(&period), content))
}

/// Active sick notes of every person the signed-in person may see
pub async fn get_sick_days_statistics(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let period = query.to_filter_period(state.clock.today())?;

    let statistics = state
        .sick_days_statistics_service
        .get_all(&context.person, &period)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(statistics)))
}

pub async fn download_sick_days_statistics(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let period = query.to_filter_period(state.clock.today())?;

    let statistics = state
        .sick_days_statistics_service
        .get_all(&context.person, &period)
        .await?;

    let export = &state.sick_days_statistics_csv_export;
    let content = to_csv_bytes(|writer| export.write(&period, &statistics, writer)).map_err(|err| {
        log::error!(
            "[{}] Error exporting sick days statistics: {}",
            req.correlation_id().unwrap_or_default(),
            err
        );
        AppError::from(err)
    })?;

    Ok(csv_attachment(&export.file_name(&period), content))
}
