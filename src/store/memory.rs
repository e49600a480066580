//! In-process store
//!
//! Every table lives behind one lock. Multi-row writes are applied to a
//! staged copy of the tables and swapped in only if every step succeeds, so
//! a failed write leaves nothing behind.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryStock, CustomerRow, LowStockRow, OrderRow, ProductFilter, ReviewRow, RevenueRow, SlugScope, Store};
use crate::domain::aggregates::order::PAYMENT_SUCCESS;
use crate::domain::aggregates::product::total_stock;
use crate::domain::aggregates::{
    Category, CategoryListing, CategoryOption, Order, OrderItem, OrderStatus, Product, ProductDetail, ProductDraft, ProductImage,
    ProductListing, Review, Role, Tag, User, Variant,
};
use crate::{AdminError, Result};

#[derive(Clone, Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    images: Vec<ProductImage>,
    variants: Vec<Variant>,
    tags: Vec<Tag>,
    product_tags: Vec<(Uuid, Uuid)>,
    users: Vec<User>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    reviews: Vec<Review>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Tables {
    fn write_product_row(&mut self, id: Uuid, draft: &ProductDraft, created_at: DateTime<Utc>) -> Result<()> {
        if self.products.iter().any(|p| p.slug == draft.slug && p.id != id) {
            return Err(AdminError::Constraint(format!("duplicate product slug {:?}", draft.slug)));
        }
        if !self.categories.iter().any(|c| c.id == draft.category_id) {
            return Err(AdminError::Constraint("product category does not exist".into()));
        }
        let row = Product {
            id,
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
            title_price: draft.title_price,
            discounted_price: draft.discounted_price,
            category_id: draft.category_id,
            main_image_url: draft.main_image_url.clone(),
            is_featured: draft.is_featured,
            is_archived: draft.is_archived,
            colors: draft.colors.clone(),
            created_at,
        };
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(existing) => *existing = row,
            None => self.products.push(row),
        }
        Ok(())
    }

    fn write_children(&mut self, product_id: Uuid, draft: &ProductDraft) -> Result<()> {
        for img in &draft.images {
            self.images.push(ProductImage {
                id: Uuid::now_v7(),
                product_id,
                url: img.url.clone(),
                key: img.key.clone(),
                alt_text: img.alt_text.clone(),
                order: img.order,
            });
        }
        for v in &draft.variants {
            if v.stock < 0 || v.price < Decimal::ZERO {
                return Err(AdminError::Constraint(format!("variant {}: {} violates stock/price check", v.kind, v.value)));
            }
            self.variants.push(Variant {
                id: Uuid::now_v7(),
                product_id,
                kind: v.kind.clone(),
                value: v.value.clone(),
                price: v.price,
                stock: v.stock,
            });
        }
        self.connect_tags(product_id, &draft.tags);
        Ok(())
    }

    fn connect_tags(&mut self, product_id: Uuid, names: &[String]) {
        for name in names {
            let tag_id = match self.tags.iter().find(|t| &t.name == name) {
                Some(t) => t.id,
                None => {
                    let tag = Tag { id: Uuid::now_v7(), name: name.clone() };
                    let id = tag.id;
                    self.tags.push(tag);
                    id
                }
            };
            if !self.product_tags.contains(&(product_id, tag_id)) {
                self.product_tags.push((product_id, tag_id));
            }
        }
    }

    fn images_of(&self, product_id: Uuid) -> Vec<ProductImage> {
        let mut images: Vec<_> = self.images.iter().filter(|i| i.product_id == product_id).cloned().collect();
        images.sort_by_key(|i| i.order);
        images
    }

    fn variants_of(&self, product_id: Uuid) -> Vec<Variant> {
        self.variants.iter().filter(|v| v.product_id == product_id).cloned().collect()
    }

    fn tags_of(&self, product_id: Uuid) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .product_tags
            .iter()
            .filter(|(p, _)| *p == product_id)
            .filter_map(|(_, t)| self.tags.iter().find(|tag| tag.id == *t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    fn detail(&self, id: Uuid) -> Option<ProductDetail> {
        let product = self.products.iter().find(|p| p.id == id)?.clone();
        let variants = self.variants_of(id);
        Some(ProductDetail {
            images: self.images_of(id),
            tags: self.tags_of(id),
            total_stock: total_stock(&variants),
            variants,
            product,
        })
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn matching_products(&self, search: Option<&str>) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .rev()
            .filter(|p| search.map_or(true, |q| contains_ci(&p.title, q) || contains_ci(&p.id.to_string(), q)))
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) -> Result<()> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.id == user.id || u.email == user.email) {
            return Err(AdminError::Constraint(format!("duplicate user {}", user.email)));
        }
        t.users.push(user);
        Ok(())
    }

    pub async fn insert_order(&self, order: Order, items: Vec<OrderItem>) -> Result<()> {
        let mut t = self.tables.write().await;
        if t.user(order.user_id).is_none() {
            return Err(AdminError::Constraint("order user does not exist".into()));
        }
        t.order_items.extend(items.into_iter().map(|mut i| {
            i.order_id = order.id;
            i
        }));
        t.orders.push(order);
        Ok(())
    }

    pub async fn insert_review(&self, review: Review) -> Result<()> {
        let mut t = self.tables.write().await;
        if !(1..=5).contains(&review.rating) {
            return Err(AdminError::Constraint("rating must be between 1 and 5".into()));
        }
        if t.user(review.user_id).is_none() || !t.products.iter().any(|p| p.id == review.product_id) {
            return Err(AdminError::Constraint("review references a missing user or product".into()));
        }
        t.reviews.push(review);
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let wanted = name.trim().to_lowercase();
        let t = self.tables.read().await;
        Ok(t.categories.iter().find(|c| c.name.to_lowercase() == wanted).cloned())
    }

    async fn slug_taken(&self, scope: SlugScope, slug: &str, exclude: Option<Uuid>) -> Result<bool> {
        let t = self.tables.read().await;
        let other = |id: Uuid| exclude != Some(id);
        Ok(match scope {
            SlugScope::Category => t.categories.iter().any(|c| c.slug == slug && other(c.id)),
            SlugScope::Product => t.products.iter().any(|p| p.slug == slug && other(p.id)),
        })
    }

    async fn insert_category(&self, name: &str, slug: &str) -> Result<Category> {
        let mut t = self.tables.write().await;
        if t.categories.iter().any(|c| c.name == name || c.slug == slug) {
            return Err(AdminError::Constraint(format!("duplicate category {name:?}")));
        }
        let category = Category { id: Uuid::now_v7(), name: name.to_string(), slug: slug.to_string(), is_active: true, created_at: Utc::now() };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, name: &str, slug: &str, is_active: bool) -> Result<Option<Category>> {
        let mut t = self.tables.write().await;
        if t.categories.iter().any(|c| c.id != id && (c.name == name || c.slug == slug)) {
            return Err(AdminError::Constraint(format!("duplicate category {name:?}")));
        }
        Ok(t.categories.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = name.to_string();
            c.slug = slug.to_string();
            c.is_active = is_active;
            c.clone()
        }))
    }

    async fn category_product_count(&self, id: Uuid) -> Result<Option<i64>> {
        let t = self.tables.read().await;
        if !t.categories.iter().any(|c| c.id == id) {
            return Ok(None);
        }
        Ok(Some(t.products.iter().filter(|p| p.category_id == id).count() as i64))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        let mut t = self.tables.write().await;
        if t.products.iter().any(|p| p.category_id == id) {
            return Err(AdminError::Constraint("category still owns products".into()));
        }
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        Ok(t.categories.len() != before)
    }

    async fn list_categories(&self) -> Result<Vec<CategoryListing>> {
        let t = self.tables.read().await;
        let mut rows: Vec<CategoryListing> = t
            .categories
            .iter()
            .rev()
            .map(|c| CategoryListing {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
                is_active: c.is_active,
                created_at: c.created_at,
                product_count: t.products.iter().filter(|p| p.category_id == c.id).count() as i64,
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn category_options(&self) -> Result<Vec<CategoryOption>> {
        let t = self.tables.read().await;
        let mut rows: Vec<CategoryOption> = t.categories.iter().map(|c| CategoryOption { id: c.id, name: c.name.clone() }).collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>> {
        let t = self.tables.read().await;
        let offset = usize::try_from(filter.offset).unwrap_or(0);
        let limit = filter.limit.and_then(|l| usize::try_from(l).ok()).unwrap_or(usize::MAX);
        Ok(t.matching_products(filter.search.as_deref())
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|p| {
                let variants = t.variants_of(p.id);
                ProductListing {
                    category_name: t.categories.iter().find(|c| c.id == p.category_id).map(|c| c.name.clone()).unwrap_or_default(),
                    tags: t.tags_of(p.id),
                    review_count: t.reviews.iter().filter(|r| r.product_id == p.id).count() as i64,
                    total_stock: total_stock(&variants),
                    variants,
                    product: p.clone(),
                }
            })
            .collect())
    }

    async fn count_products(&self, search: Option<&str>) -> Result<i64> {
        let t = self.tables.read().await;
        Ok(t.matching_products(search).len() as i64)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        let t = self.tables.read().await;
        Ok(t.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<ProductDetail> {
        let mut guard = self.tables.write().await;
        let mut staged = guard.clone();
        let id = Uuid::now_v7();
        staged.write_product_row(id, draft, Utc::now())?;
        staged.write_children(id, draft)?;
        let detail = staged.detail(id).ok_or(AdminError::NotFound("Product"))?;
        *guard = staged;
        Ok(detail)
    }

    async fn replace_product(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<ProductDetail>> {
        let mut guard = self.tables.write().await;
        let Some(created_at) = guard.products.iter().find(|p| p.id == id).map(|p| p.created_at) else {
            return Ok(None);
        };
        let mut staged = guard.clone();
        staged.images.retain(|i| i.product_id != id);
        staged.variants.retain(|v| v.product_id != id);
        staged.write_product_row(id, draft, created_at)?;
        staged.product_tags.retain(|(p, _)| *p != id);
        staged.write_children(id, draft)?;
        let detail = staged.detail(id);
        *guard = staged;
        Ok(detail)
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let mut t = self.tables.write().await;
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        if t.products.len() == before {
            return Ok(false);
        }
        t.images.retain(|i| i.product_id != id);
        t.variants.retain(|v| v.product_id != id);
        t.product_tags.retain(|(p, _)| *p != id);
        t.reviews.retain(|r| r.product_id != id);
        for item in t.order_items.iter_mut().filter(|i| i.product_id == Some(id)) {
            item.product_id = None;
        }
        Ok(true)
    }

    async fn set_product_archived(&self, id: Uuid, archived: bool) -> Result<bool> {
        let mut t = self.tables.write().await;
        Ok(t.products.iter_mut().find(|p| p.id == id).map(|p| p.is_archived = archived).is_some())
    }

    async fn product_images(&self, product_id: Uuid) -> Result<Vec<ProductImage>> {
        let t = self.tables.read().await;
        Ok(t.images_of(product_id))
    }

    async fn product_tags(&self, product_id: Uuid) -> Result<Vec<Tag>> {
        let t = self.tables.read().await;
        Ok(t.tags_of(product_id))
    }

    async fn sync_product_tags(&self, product_id: Uuid, names: &[String]) -> Result<bool> {
        let mut t = self.tables.write().await;
        if !t.products.iter().any(|p| p.id == product_id) {
            return Ok(false);
        }
        t.product_tags.retain(|(p, _)| *p != product_id);
        t.connect_tags(product_id, names);
        Ok(true)
    }

    async fn paid_revenue(&self) -> Result<Decimal> {
        let t = self.tables.read().await;
        Ok(t.orders.iter().filter(|o| o.payment_status == PAYMENT_SUCCESS).map(|o| o.total_price).sum())
    }

    async fn customer_count(&self) -> Result<i64> {
        let t = self.tables.read().await;
        Ok(t.users.iter().filter(|u| u.role == Role::User).count() as i64)
    }

    async fn active_product_count(&self) -> Result<i64> {
        let t = self.tables.read().await;
        Ok(t.products.iter().filter(|p| !p.is_archived).count() as i64)
    }

    async fn average_rating(&self) -> Result<Option<f64>> {
        let t = self.tables.read().await;
        if t.reviews.is_empty() {
            return Ok(None);
        }
        let sum: i64 = t.reviews.iter().map(|r| i64::from(r.rating)).sum();
        Ok(Some(sum as f64 / t.reviews.len() as f64))
    }

    async fn variants_below(&self, threshold: i32) -> Result<i64> {
        let t = self.tables.read().await;
        Ok(t.variants.iter().filter(|v| v.stock < threshold).count() as i64)
    }

    async fn low_stock_variants(&self, threshold: i32, limit: i64) -> Result<Vec<LowStockRow>> {
        let t = self.tables.read().await;
        let mut low: Vec<&Variant> = t.variants.iter().filter(|v| v.stock < threshold).collect();
        low.sort_by_key(|v| v.stock);
        Ok(low
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|v| LowStockRow {
                product_title: t.products.iter().find(|p| p.id == v.product_id).map(|p| p.title.clone()).unwrap_or_default(),
                variant_type: v.kind.clone(),
                variant_value: v.value.clone(),
                stock: v.stock,
            })
            .collect())
    }

    async fn paid_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<RevenueRow>> {
        let t = self.tables.read().await;
        Ok(t.orders
            .iter()
            .filter(|o| o.payment_status == PAYMENT_SUCCESS && o.created_at >= since)
            .map(|o| RevenueRow { total_price: o.total_price, created_at: o.created_at })
            .collect())
    }

    async fn category_stock(&self) -> Result<Vec<CategoryStock>> {
        let t = self.tables.read().await;
        let mut rows: Vec<CategoryStock> = t
            .categories
            .iter()
            .map(|c| {
                let stock = t
                    .products
                    .iter()
                    .filter(|p| p.category_id == c.id)
                    .flat_map(|p| t.variants.iter().filter(move |v| v.product_id == p.id))
                    .map(|v| i64::from(v.stock))
                    .sum();
                CategoryStock { id: c.id, name: c.name.clone(), stock }
            })
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn reviews_at_most(&self, max_rating: i32, limit: i64) -> Result<Vec<ReviewRow>> {
        let t = self.tables.read().await;
        let mut reviews: Vec<&Review> = t.reviews.iter().rev().filter(|r| r.rating <= max_rating).collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .filter_map(|r| {
                let user = t.user(r.user_id)?;
                let product = t.products.iter().find(|p| p.id == r.product_id)?;
                Some(ReviewRow {
                    id: r.id,
                    rating: r.rating,
                    comment: r.comment.clone(),
                    created_at: r.created_at,
                    product_title: product.title.clone(),
                    user_name: user.name.clone(),
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                })
            })
            .collect())
    }

    async fn orders(&self, search: Option<&str>, limit: Option<i64>) -> Result<Vec<OrderRow>> {
        let t = self.tables.read().await;
        let mut rows: Vec<OrderRow> = t
            .orders
            .iter()
            .rev()
            .filter_map(|o| {
                let user = t.user(o.user_id)?;
                let matches = search.map_or(true, |q| {
                    contains_ci(&o.id.to_string(), q) || contains_ci(&o.tx_ref, q) || user.name.as_deref().is_some_and(|n| contains_ci(n, q))
                });
                matches.then(|| OrderRow {
                    id: o.id,
                    total_price: o.total_price,
                    status: o.status,
                    payment_status: o.payment_status.clone(),
                    tx_ref: o.tx_ref.clone(),
                    created_at: o.created_at,
                    customer_name: user.name.clone(),
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    email: user.email.clone(),
                    items_count: t.order_items.iter().filter(|i| i.order_id == o.id).count() as i64,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit.and_then(|l| usize::try_from(l).ok()) {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn customers(&self, search: Option<&str>) -> Result<Vec<CustomerRow>> {
        let t = self.tables.read().await;
        let mut rows: Vec<CustomerRow> = t
            .users
            .iter()
            .rev()
            .filter(|u| u.role == Role::User)
            .filter(|u| {
                search.map_or(true, |q| {
                    u.name.as_deref().is_some_and(|n| contains_ci(n, q))
                        || contains_ci(&u.email, q)
                        || contains_ci(&u.first_name, q)
                        || contains_ci(&u.last_name, q)
                })
            })
            .map(|u| {
                let completed: Vec<&Order> = t.orders.iter().filter(|o| o.user_id == u.id && o.status == OrderStatus::Completed).collect();
                CustomerRow {
                    id: u.id,
                    email: u.email.clone(),
                    name: u.name.clone(),
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    image: u.image.clone(),
                    created_at: u.created_at,
                    completed_orders: completed.len() as i64,
                    completed_spend: completed.iter().map(|o| o.total_price).sum(),
                }
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::aggregates::ImageDraft;

    #[tokio::test]
    async fn test_failed_replace_leaves_product_untouched() {
        let store = MemoryStore::new();
        let cat = store.insert_category("Audio", "audio").await.unwrap();
        let created = store.insert_product(&draft(cat.id, "headphones", &[3, 4])).await.unwrap();

        let mut bad = draft(cat.id, "headphones-v2", &[10, -1]);
        bad.images.push(ImageDraft { url: "https://cdn.example.com/x.png".into(), key: "x".into(), alt_text: None, order: 1 });
        bad.tags = vec!["sale".into()];
        let err = store.replace_product(created.product.id, &bad).await.unwrap_err();
        assert!(matches!(err, AdminError::Constraint(_)));

        let t = store.tables.read().await;
        let after = t.detail(created.product.id).unwrap();
        assert_eq!(after.product.slug, "headphones");
        assert_eq!(after.images, created.images);
        assert_eq!(after.variants, created.variants);
        assert_eq!(after.tags, created.tags);
        assert!(!t.tags.iter().any(|tag| tag.name == "sale"));
    }

    #[tokio::test]
    async fn test_replace_swaps_children_and_reuses_tags() {
        let store = MemoryStore::new();
        let cat = store.insert_category("Audio", "audio").await.unwrap();
        let created = store.insert_product(&draft(cat.id, "speaker", &[1])).await.unwrap();

        let mut next = draft(cat.id, "speaker", &[7, 8, 9]);
        next.tags = vec!["new".into(), "loud".into()];
        let replaced = store.replace_product(created.product.id, &next).await.unwrap().unwrap();
        assert_eq!(replaced.variants.len(), 3);
        assert_eq!(replaced.total_stock, 24);
        assert_eq!(replaced.product.created_at, created.product.created_at);
        assert_eq!(replaced.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["loud", "new"]);

        let t = store.tables.read().await;
        assert_eq!(t.tags.len(), 2);
        assert_eq!(t.variants.len(), 3);
    }

    #[tokio::test]
    async fn test_replace_missing_product() {
        let store = MemoryStore::new();
        let cat = store.insert_category("Audio", "audio").await.unwrap();
        assert!(store.replace_product(Uuid::new_v4(), &draft(cat.id, "ghost", &[])).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_product_requires_existing_category_and_unique_slug() {
        let store = MemoryStore::new();
        assert!(store.insert_product(&draft(Uuid::new_v4(), "orphan", &[])).await.is_err());

        let cat = store.insert_category("Audio", "audio").await.unwrap();
        store.insert_product(&draft(cat.id, "dup", &[])).await.unwrap();
        assert!(matches!(store.insert_product(&draft(cat.id, "dup", &[])).await, Err(AdminError::Constraint(_))));
        assert_eq!(store.count_products(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_product_detaches_order_items() {
        let store = MemoryStore::new();
        let cat = store.insert_category("Audio", "audio").await.unwrap();
        let p = store.insert_product(&draft(cat.id, "amp", &[2])).await.unwrap();
        let u = user("a@example.com", "Ada", "Lovelace", None);
        let uid = u.id;
        store.insert_user(u).await.unwrap();
        let o = order(uid, Decimal::new(100, 0), OrderStatus::Completed, true, Utc::now());
        let item = OrderItem { id: Uuid::new_v4(), order_id: Uuid::nil(), product_id: Some(p.product.id), quantity: 1, price: Decimal::new(100, 0) };
        store.insert_order(o, vec![item]).await.unwrap();

        assert!(store.delete_product(p.product.id).await.unwrap());
        let t = store.tables.read().await;
        assert_eq!(t.order_items.len(), 1);
        assert_eq!(t.order_items[0].product_id, None);
        assert!(t.variants.is_empty());
    }

    #[tokio::test]
    async fn test_category_stock_sums_nested_variants() {
        let store = MemoryStore::new();
        let audio = store.insert_category("Audio", "audio").await.unwrap();
        let empty = store.insert_category("Empty", "empty").await.unwrap();
        store.insert_product(&draft(audio.id, "a", &[1, 2])).await.unwrap();
        store.insert_product(&draft(audio.id, "b", &[3])).await.unwrap();
        let rows = store.category_stock().await.unwrap();
        let find = |id| rows.iter().find(|r| r.id == id).unwrap().stock;
        assert_eq!(find(audio.id), 6);
        assert_eq!(find(empty.id), 0);
    }
}
