//! Storage seam
//!
//! Services talk to a [`Store`]; [`PgStore`] backs it with PostgreSQL and
//! [`MemoryStore`] keeps everything in process for development and tests.
//! Both enforce the same constraints: unique slugs and tag names, foreign
//! keys, and non-negative variant stock and price.

mod demo;
mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[cfg(test)]
pub(crate) use memory::fixtures;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{
    Category, CategoryListing, CategoryOption, OrderStatus, Product, ProductDetail, ProductDraft, ProductImage, ProductListing, Tag,
};
use crate::Result;

/// Which table a slug must be unique in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlugScope {
    Category,
    Product,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive match on title or id.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RevenueRow {
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CategoryStock {
    pub id: Uuid,
    pub name: String,
    pub stock: i64,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LowStockRow {
    pub product_title: String,
    pub variant_type: String,
    pub variant_value: String,
    pub stock: i32,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct OrderRow {
    pub id: Uuid,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub payment_status: String,
    pub tx_ref: String,
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub items_count: i64,
}

/// A USER-role account with its COMPLETED order totals.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_orders: i64,
    pub completed_spend: Decimal,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub product_title: String,
    pub user_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

#[async_trait]
pub trait Store: Send + Sync {
    // ---- categories -------------------------------------------------------

    /// Case-insensitive lookup on the trimmed name.
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;
    async fn slug_taken(&self, scope: SlugScope, slug: &str, exclude: Option<Uuid>) -> Result<bool>;
    async fn insert_category(&self, name: &str, slug: &str) -> Result<Category>;
    async fn update_category(&self, id: Uuid, name: &str, slug: &str, is_active: bool) -> Result<Option<Category>>;
    /// `None` when the category does not exist.
    async fn category_product_count(&self, id: Uuid) -> Result<Option<i64>>;
    async fn delete_category(&self, id: Uuid) -> Result<bool>;
    /// Newest first.
    async fn list_categories(&self) -> Result<Vec<CategoryListing>>;
    /// Ordered by name.
    async fn category_options(&self) -> Result<Vec<CategoryOption>>;

    // ---- products ---------------------------------------------------------

    /// Newest first.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>>;
    async fn count_products(&self, search: Option<&str>) -> Result<i64>;
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn insert_product(&self, draft: &ProductDraft) -> Result<ProductDetail>;
    /// Overwrites the product row and replaces its images, variants and tag
    /// links in one transaction. `None` when the product does not exist.
    async fn replace_product(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<ProductDetail>>;
    async fn delete_product(&self, id: Uuid) -> Result<bool>;
    async fn set_product_archived(&self, id: Uuid, archived: bool) -> Result<bool>;
    /// Ordered by image position.
    async fn product_images(&self, product_id: Uuid) -> Result<Vec<ProductImage>>;

    // ---- tags -------------------------------------------------------------

    async fn product_tags(&self, product_id: Uuid) -> Result<Vec<Tag>>;
    /// Clears the product's tag links, then connects each name, creating missing tags.
    async fn sync_product_tags(&self, product_id: Uuid, names: &[String]) -> Result<bool>;

    // ---- dashboard aggregates ---------------------------------------------

    /// Sum of `total_price` over orders whose payment succeeded.
    async fn paid_revenue(&self) -> Result<Decimal>;
    async fn customer_count(&self) -> Result<i64>;
    async fn active_product_count(&self) -> Result<i64>;
    async fn average_rating(&self) -> Result<Option<f64>>;
    async fn variants_below(&self, threshold: i32) -> Result<i64>;
    /// Ascending by stock.
    async fn low_stock_variants(&self, threshold: i32, limit: i64) -> Result<Vec<LowStockRow>>;
    async fn paid_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<RevenueRow>>;
    /// Total variant stock per category, zero-stock categories included.
    async fn category_stock(&self) -> Result<Vec<CategoryStock>>;
    /// Newest first.
    async fn reviews_at_most(&self, max_rating: i32, limit: i64) -> Result<Vec<ReviewRow>>;

    // ---- orders and customers ---------------------------------------------

    /// Newest first; `search` matches id, tx_ref or customer name.
    async fn orders(&self, search: Option<&str>, limit: Option<i64>) -> Result<Vec<OrderRow>>;
    /// Newest accounts first; `search` matches name, email, first or last name.
    async fn customers(&self, search: Option<&str>) -> Result<Vec<CustomerRow>>;
}
