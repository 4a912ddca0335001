use actix_web::{web, HttpRequest, HttpResponse, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::models::{FederalState, PersonId, WorkingTimeInput};
use crate::handlers::shared::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FederalStateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FederalStateResponse {
    pub person_id: PersonId,
    pub date: NaiveDate,
    pub federal_state: FederalState,
}

/// All working times of a person, newest first
pub async fn get_working_times(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PersonId>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let person_id = path.into_inner();
    context.require_access_to(person_id)?;

    let person = state.person_service.get_existing(person_id).await?;
    let working_times = state.working_time_service.get_by_person(&person).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(working_times)))
}

/// Set the working days of a person starting at a date
pub async fn create_working_time(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PersonId>,
    input: web::Json<WorkingTimeInput>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    context.require_office()?;

    let person = state.person_service.get_existing(path.into_inner()).await?;
    let input = input.into_inner();

    let working_time = state
        .working_time_service
        .touch(&input.working_days, input.valid_from, &person, input.federal_state)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(working_time)))
}

/// Federal state whose public holidays apply to a person on a date (default today)
pub async fn get_federal_state(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PersonId>,
    query: web::Query<FederalStateQuery>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let person_id = path.into_inner();
    context.require_access_to(person_id)?;

    let person = state.person_service.get_existing(person_id).await?;
    let date = query.date.unwrap_or_else(|| state.clock.today());
    let federal_state = state
        .working_time_service
        .federal_state_for(&person, date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(FederalStateResponse {
        person_id,
        date,
        federal_state,
    })))
}
