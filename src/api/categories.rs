use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{ActionResponse, ApiError, ApiResult, AppState};
use crate::domain::aggregates::{Category, CategoryInput, CategoryListing, CategoryOption, CategoryUpdate};

pub async fn list(State(s): State<AppState>) -> Json<Vec<CategoryListing>> {
    Json(s.categories.list().await)
}

pub async fn options(State(s): State<AppState>) -> Json<Vec<CategoryOption>> {
    Json(s.categories.options().await)
}

pub async fn create(
    State(s): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse<Category>>), ApiError> {
    let Json(input) = payload?;
    let category = s.categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(ActionResponse::ok(category))))
}

pub async fn update(
    State(s): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CategoryUpdate>, JsonRejection>,
) -> ApiResult<Category> {
    let Path(id) = path?;
    let Json(input) = payload?;
    Ok(Json(ActionResponse::ok(s.categories.update(id, input).await?)))
}

pub async fn delete(State(s): State<AppState>, path: Result<Path<Uuid>, PathRejection>) -> ApiResult<()> {
    let Path(id) = path?;
    s.categories.delete(id).await?;
    Ok(Json(ActionResponse::done()))
}
