use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::{ActionResponse, ApiError, ApiResult, AppState};
use crate::domain::aggregates::{ProductDetail, ProductImage, ProductInput, ProductListing, Tag};
use crate::services::products::{AdminListParams, ProductPage};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    pub is_archived: bool,
}

#[derive(Debug, Deserialize)]
pub struct SyncTagsRequest {
    #[serde(default)]
    pub tags: Vec<String>,
}

pub async fn list(State(s): State<AppState>) -> Json<Vec<ProductListing>> {
    Json(s.products.list().await)
}

pub async fn admin_list(
    State(s): State<AppState>,
    params: Result<Query<AdminListParams>, QueryRejection>,
) -> Json<ProductPage> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    Json(s.products.admin_list(params).await)
}

pub async fn create(
    State(s): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse<ProductDetail>>), ApiError> {
    let Json(input) = payload?;
    let detail = s.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(ActionResponse::ok(detail))))
}

pub async fn update(
    State(s): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> ApiResult<ProductDetail> {
    let Path(id) = path?;
    let Json(input) = payload?;
    Ok(Json(ActionResponse::ok(s.products.update(id, input).await?)))
}

pub async fn delete(State(s): State<AppState>, path: Result<Path<Uuid>, PathRejection>) -> ApiResult<()> {
    let Path(id) = path?;
    s.products.delete(id).await?;
    Ok(Json(ActionResponse::done()))
}

pub async fn set_archived(
    State(s): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ArchiveRequest>, JsonRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    let Json(req) = payload?;
    s.products.set_archived(id, req.is_archived).await?;
    Ok(Json(ActionResponse::done()))
}

pub async fn images(State(s): State<AppState>, path: Result<Path<Uuid>, PathRejection>) -> Json<Vec<ProductImage>> {
    match path {
        Ok(Path(id)) => Json(s.products.images(id).await),
        Err(_) => Json(Vec::new()),
    }
}

pub async fn tags(State(s): State<AppState>, path: Result<Path<Uuid>, PathRejection>) -> Json<Vec<Tag>> {
    match path {
        Ok(Path(id)) => Json(s.products.tags(id).await),
        Err(_) => Json(Vec::new()),
    }
}

pub async fn sync_tags(
    State(s): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<SyncTagsRequest>, JsonRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    let Json(req) = payload?;
    s.products.sync_tags(id, req.tags).await?;
    Ok(Json(ActionResponse::done()))
}
