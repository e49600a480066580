use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::services::dashboard::{CategoryShare, LowStockItem, Metrics, RecentOrder, RevenueSeries, TopCustomer, UrgentReview};

pub async fn metrics(State(s): State<AppState>) -> Json<Metrics> {
    Json(s.dashboard.metrics().await)
}

pub async fn recent_orders(State(s): State<AppState>) -> Json<Vec<RecentOrder>> {
    Json(s.dashboard.recent_orders().await)
}

pub async fn low_stock(State(s): State<AppState>) -> Json<Vec<LowStockItem>> {
    Json(s.dashboard.low_stock().await)
}

pub async fn revenue(State(s): State<AppState>) -> Json<RevenueSeries> {
    Json(s.dashboard.revenue_series().await)
}

pub async fn categories(State(s): State<AppState>) -> Json<Vec<CategoryShare>> {
    Json(s.dashboard.category_distribution().await)
}

pub async fn top_customers(State(s): State<AppState>) -> Json<Vec<TopCustomer>> {
    Json(s.dashboard.top_customers().await)
}

pub async fn urgent_reviews(State(s): State<AppState>) -> Json<Vec<UrgentReview>> {
    Json(s.dashboard.urgent_reviews().await)
}
