use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;

use super::orders::SearchParams;
use super::AppState;
use crate::services::customers::CustomersPage;

pub async fn list(State(s): State<AppState>, params: Result<Query<SearchParams>, QueryRejection>) -> Json<CustomersPage> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    Json(s.customers.list(params.query.as_deref()).await)
}
