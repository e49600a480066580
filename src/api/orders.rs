use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::services::orders::OrdersPage;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

pub async fn list(State(s): State<AppState>, params: Result<Query<SearchParams>, QueryRejection>) -> Json<OrdersPage> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    Json(s.orders.list(params.query.as_deref()).await)
}
