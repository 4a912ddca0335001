use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::Deserialize;

use crate::database::models::{ApplicationAction, OvertimeAction};
use crate::handlers::shared::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentInput<A> {
    pub action: A,
    pub text: Option<String>,
}

pub async fn get_application_comments(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    state.user_context_service.extract_context(&req).await?;

    let comments = state
        .comment_service
        .get_comments_by_application(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(comments)))
}

pub async fn create_application_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    input: web::Json<CommentInput<ApplicationAction>>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let input = input.into_inner();

    let comment = state
        .comment_service
        .create_application_comment(path.into_inner(), input.action, input.text, &context.person)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(comment)))
}

pub async fn get_overtime_comments(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    state.user_context_service.extract_context(&req).await?;

    let comments = state
        .comment_service
        .get_comments_by_overtime(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(comments)))
}

pub async fn create_overtime_comment(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    input: web::Json<CommentInput<OvertimeAction>>,
) -> Result<HttpResponse> {
    let context = state.user_context_service.extract_context(&req).await?;
    let input = input.into_inner();

    let comment = state
        .comment_service
        .create_overtime_comment(path.into_inner(), input.action, input.text, &context.person)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(comment)))
}
