//! HTTP surface
//!
//! Reads answer with plain JSON and never fail. Mutations answer with an
//! [`ActionResponse`] envelope; a failed mutation carries a message that is
//! safe to show the admin, while infrastructure detail stays in the log.

pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::revalidate::Revalidator;
use crate::services::{CategoryService, CustomerService, DashboardService, OrderService, ProductService};
use crate::store::Store;
use crate::AdminError;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Clone)]
pub struct AppState {
    pub categories: CategoryService,
    pub products: ProductService,
    pub dashboard: DashboardService,
    pub orders: OrderService,
    pub customers: CustomerService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, revalidator: Revalidator) -> Self {
        Self {
            categories: CategoryService::new(store.clone(), revalidator.clone()),
            products: ProductService::new(store.clone(), revalidator),
            dashboard: DashboardService::new(store.clone()),
            orders: OrderService::new(store.clone()),
            customers: CustomerService::new(store),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }
}

impl ActionResponse<()> {
    pub fn done() -> Self {
        Self { success: true, data: None, error: None }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()) }
    }
}

pub type ApiResult<T> = Result<Json<ActionResponse<T>>, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// The body could not be read as the expected payload.
    Malformed(String),
    /// The path segment is not a valid record id.
    InvalidId(String),
    Admin(AdminError),
}

impl From<AdminError> for ApiError {
    fn from(e: AdminError) -> Self {
        ApiError::Admin(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidId(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Malformed(detail) => {
                tracing::debug!(%detail, "rejected payload");
                (StatusCode::BAD_REQUEST, "Invalid fields".to_string())
            }
            ApiError::InvalidId(detail) => {
                tracing::debug!(%detail, "rejected path");
                (StatusCode::BAD_REQUEST, "Invalid id".to_string())
            }
            ApiError::Admin(e) => match e {
                AdminError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
                AdminError::DuplicateCategoryName | AdminError::CategoryInUse(_) => (StatusCode::CONFLICT, e.to_string()),
                AdminError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                AdminError::Constraint(detail) => {
                    tracing::warn!(%detail, "constraint violation");
                    (StatusCode::CONFLICT, "This change conflicts with existing data.".to_string())
                }
                AdminError::Storage(_) | AdminError::Timeout => {
                    tracing::error!(error = %e, "request failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE.to_string())
                }
            },
        };
        (status, Json(ActionResponse::failed(message))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route("/categories/options", get(categories::options))
        .route("/categories/:id", put(categories::update).delete(categories::delete))
        .route("/products", get(products::list).post(products::create))
        .route("/admin/products", get(products::admin_list))
        .route("/products/:id", put(products::update).delete(products::delete))
        .route("/products/:id/archive", put(products::set_archived))
        .route("/products/:id/images", get(products::images))
        .route("/products/:id/tags", get(products::tags).put(products::sync_tags))
        .route("/dashboard/metrics", get(dashboard::metrics))
        .route("/dashboard/recent-orders", get(dashboard::recent_orders))
        .route("/dashboard/low-stock", get(dashboard::low_stock))
        .route("/dashboard/revenue", get(dashboard::revenue))
        .route("/dashboard/categories", get(dashboard::categories))
        .route("/dashboard/top-customers", get(dashboard::top_customers))
        .route("/dashboard/urgent-reviews", get(dashboard::urgent_reviews))
        .route("/orders", get(orders::list))
        .route("/customers", get(customers::list));

    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront-admin"})) }))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
