use actix_web::{web, HttpRequest, HttpResponse, Result};

use crate::database::models::{PersonBasedata, PersonBasedataInput, PersonId};
use crate::handlers::shared::ApiResponse;
use crate::AppState;

/// Base data of a person; blank values when nothing is stored yet
pub async fn get_basedata(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PersonId>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let person_id = path.into_inner();
    context.require_access_to(person_id)?;

    let person = state.person_service.get_existing(person_id).await?;
    let basedata = state
        .basedata_service
        .get_basedata_by_person_id(person.id)
        .await?
        .unwrap_or_else(|| PersonBasedata::empty(person.id));

    Ok(HttpResponse::Ok().json(ApiResponse::success(basedata)))
}

pub async fn update_basedata(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PersonId>,
    input: web::Json<PersonBasedataInput>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    context.require_office()?;

    let person = state.person_service.get_existing(path.into_inner()).await?;
    let basedata = state
        .basedata_service
        .update(person.id, input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(basedata),
        "Base data updated",
    )))
}
