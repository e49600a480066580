//! PostgreSQL store

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{CategoryStock, CustomerRow, LowStockRow, OrderRow, ProductFilter, ReviewRow, RevenueRow, SlugScope, Store};
use crate::config::Config;
use crate::domain::aggregates::order::PAYMENT_SUCCESS;
use crate::domain::aggregates::product::total_stock;
use crate::domain::aggregates::{
    Category, CategoryListing, CategoryOption, Product, ProductDetail, ProductDraft, ProductImage, ProductListing, Tag, Variant,
};
use crate::{AdminError, Result};

const PRODUCT_COLUMNS: &str = "p.id, p.title, p.slug, p.description, p.title_price, p.discounted_price, p.category_id, \
     p.main_image_url, p.is_featured, p.is_archived, p.colors, p.created_at";
const CATEGORY_COLUMNS: &str = "id, name, slug, is_active, created_at";
const VARIANT_COLUMNS: &str = "id, product_id, variant_type, value, price, stock";

/// Substring pattern for `ILIKE ... ESCAPE '\'`; the search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    product: Product,
    category_name: String,
    review_count: i64,
}

#[derive(sqlx::FromRow)]
struct TagLink {
    product_id: Uuid,
    #[sqlx(flatten)]
    tag: Tag,
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    tx_timeout: Duration,
}

impl PgStore {
    pub async fn connect(url: &str, config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.tx_max_wait)
            .connect(url)
            .await?;
        Ok(Self { pool, tx_timeout: config.tx_timeout })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn replace_in_tx(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<ProductDetail>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM product_images WHERE product_id = $1").bind(id).execute(&mut *tx).await?;
        sqlx::query("DELETE FROM variants WHERE product_id = $1").bind(id).execute(&mut *tx).await?;

        let updated = sqlx::query(
            "UPDATE products SET title = $2, slug = $3, description = $4, title_price = $5, discounted_price = $6, \
             category_id = $7, main_image_url = $8, is_featured = $9, is_archived = $10, colors = $11 WHERE id = $1",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.slug)
        .bind(&draft.description)
        .bind(draft.title_price)
        .bind(draft.discounted_price)
        .bind(draft.category_id)
        .bind(&draft.main_image_url)
        .bind(draft.is_featured)
        .bind(draft.is_archived)
        .bind(&draft.colors)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query("DELETE FROM product_tags WHERE product_id = $1").bind(id).execute(&mut *tx).await?;
        write_children(&mut tx, id, draft).await?;

        let detail = load_detail(&mut tx, id).await?;
        tx.commit().await?;
        Ok(detail)
    }
}

async fn write_children(conn: &mut PgConnection, product_id: Uuid, draft: &ProductDraft) -> Result<()> {
    for img in &draft.images {
        sqlx::query("INSERT INTO product_images (id, product_id, url, key, alt_text, position) VALUES ($1, $2, $3, $4, $5, $6)")
            .bind(Uuid::now_v7())
            .bind(product_id)
            .bind(&img.url)
            .bind(&img.key)
            .bind(&img.alt_text)
            .bind(img.order)
            .execute(&mut *conn)
            .await?;
    }
    for v in &draft.variants {
        sqlx::query("INSERT INTO variants (id, product_id, variant_type, value, price, stock) VALUES ($1, $2, $3, $4, $5, $6)")
            .bind(Uuid::now_v7())
            .bind(product_id)
            .bind(&v.kind)
            .bind(&v.value)
            .bind(v.price)
            .bind(v.stock)
            .execute(&mut *conn)
            .await?;
    }
    connect_tags(conn, product_id, &draft.tags).await
}

async fn connect_tags(conn: &mut PgConnection, product_id: Uuid, names: &[String]) -> Result<()> {
    for name in names {
        let tag_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tags (id, name) VALUES ($1, $2) ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
        sqlx::query("INSERT INTO product_tags (product_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(product_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn load_detail(conn: &mut PgConnection, id: Uuid) -> Result<Option<ProductDetail>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(product) = product else { return Ok(None) };

    let images = sqlx::query_as::<_, ProductImage>(
        "SELECT id, product_id, url, key, alt_text, position FROM product_images WHERE product_id = $1 ORDER BY position, id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;
    let variants = sqlx::query_as::<_, Variant>(&format!("SELECT {VARIANT_COLUMNS} FROM variants WHERE product_id = $1 ORDER BY id"))
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT t.id, t.name FROM tags t JOIN product_tags pt ON pt.tag_id = t.id WHERE pt.product_id = $1 ORDER BY t.name",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let total_stock = total_stock(&variants);
    Ok(Some(ProductDetail { product, images, variants, tags, total_stock }))
}

#[async_trait]
impl Store for PgStore {
    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let c = sqlx::query_as::<_, Category>(&format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE LOWER(name) = LOWER($1) LIMIT 1"))
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(c)
    }

    async fn slug_taken(&self, scope: SlugScope, slug: &str, exclude: Option<Uuid>) -> Result<bool> {
        let table = match scope {
            SlugScope::Category => "categories",
            SlugScope::Product => "products",
        };
        let taken: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))"
        ))
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn insert_category(&self, name: &str, slug: &str) -> Result<Category> {
        let c = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (id, name, slug, is_active, created_at) VALUES ($1, $2, $3, TRUE, NOW()) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;
        Ok(c)
    }

    async fn update_category(&self, id: Uuid, name: &str, slug: &str, is_active: bool) -> Result<Option<Category>> {
        let c = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET name = $2, slug = $3, is_active = $4 WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(c)
    }

    async fn category_product_count(&self, id: Uuid) -> Result<Option<i64>> {
        let count = sqlx::query_scalar("SELECT (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) FROM categories c WHERE c.id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(count)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        let r = sqlx::query("DELETE FROM categories WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(r.rows_affected() > 0)
    }

    async fn list_categories(&self) -> Result<Vec<CategoryListing>> {
        let rows = sqlx::query_as::<_, CategoryListing>(
            "SELECT c.id, c.name, c.slug, c.is_active, c.created_at, COUNT(p.id) AS product_count \
             FROM categories c LEFT JOIN products p ON p.category_id = c.id \
             GROUP BY c.id ORDER BY c.created_at DESC, c.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn category_options(&self) -> Result<Vec<CategoryOption>> {
        let rows = sqlx::query_as::<_, CategoryOption>("SELECT id, name FROM categories ORDER BY name ASC").fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>> {
        let rows = sqlx::query_as::<_, ListingRow>(&format!(
            "SELECT {PRODUCT_COLUMNS}, c.name AS category_name, \
             (SELECT COUNT(*) FROM reviews r WHERE r.product_id = p.id) AS review_count \
             FROM products p JOIN categories c ON c.id = p.category_id \
             WHERE ($1::text IS NULL OR p.title ILIKE $1 ESCAPE '\\' OR p.id::text ILIKE $1 ESCAPE '\\') \
             ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(filter.search.as_deref().map(like_pattern))
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.product.id).collect();
        let mut variants: HashMap<Uuid, Vec<Variant>> = HashMap::new();
        for v in sqlx::query_as::<_, Variant>(&format!("SELECT {VARIANT_COLUMNS} FROM variants WHERE product_id = ANY($1) ORDER BY id"))
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?
        {
            variants.entry(v.product_id).or_default().push(v);
        }
        let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in sqlx::query_as::<_, TagLink>(
            "SELECT pt.product_id, t.id, t.name FROM product_tags pt JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.product_id = ANY($1) ORDER BY t.name",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?
        {
            tags.entry(link.product_id).or_default().push(link.tag);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let variants = variants.remove(&row.product.id).unwrap_or_default();
                let tags = tags.remove(&row.product.id).unwrap_or_default();
                ProductListing {
                    total_stock: total_stock(&variants),
                    product: row.product,
                    category_name: row.category_name,
                    variants,
                    tags,
                    review_count: row.review_count,
                }
            })
            .collect())
    }

    async fn count_products(&self, search: Option<&str>) -> Result<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products p \
             WHERE ($1::text IS NULL OR p.title ILIKE $1 ESCAPE '\\' OR p.id::text ILIKE $1 ESCAPE '\\')",
        )
        .bind(search.map(like_pattern))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        let p = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(p)
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<ProductDetail> {
        let mut tx = self.pool.begin().await?;
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO products (id, title, slug, description, title_price, discounted_price, category_id, main_image_url, \
             is_featured, is_archived, colors, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.slug)
        .bind(&draft.description)
        .bind(draft.title_price)
        .bind(draft.discounted_price)
        .bind(draft.category_id)
        .bind(&draft.main_image_url)
        .bind(draft.is_featured)
        .bind(draft.is_archived)
        .bind(&draft.colors)
        .execute(&mut *tx)
        .await?;
        write_children(&mut tx, id, draft).await?;
        let detail = load_detail(&mut tx, id).await?.ok_or(AdminError::NotFound("Product"))?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn replace_product(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<ProductDetail>> {
        // Dropping the transaction on timeout rolls it back.
        match tokio::time::timeout(self.tx_timeout, self.replace_in_tx(id, draft)).await {
            Ok(result) => result,
            Err(_) => Err(AdminError::Timeout),
        }
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let r = sqlx::query("DELETE FROM products WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(r.rows_affected() > 0)
    }

    async fn set_product_archived(&self, id: Uuid, archived: bool) -> Result<bool> {
        let r = sqlx::query("UPDATE products SET is_archived = $2 WHERE id = $1").bind(id).bind(archived).execute(&self.pool).await?;
        Ok(r.rows_affected() > 0)
    }

    async fn product_images(&self, product_id: Uuid) -> Result<Vec<ProductImage>> {
        let rows = sqlx::query_as::<_, ProductImage>(
            "SELECT id, product_id, url, key, alt_text, position FROM product_images WHERE product_id = $1 ORDER BY position, id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn product_tags(&self, product_id: Uuid) -> Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name FROM tags t JOIN product_tags pt ON pt.tag_id = t.id WHERE pt.product_id = $1 ORDER BY t.name",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn sync_product_tags(&self, product_id: Uuid, names: &[String]) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM products WHERE id = $1 FOR UPDATE")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(false);
        }
        sqlx::query("DELETE FROM product_tags WHERE product_id = $1").bind(product_id).execute(&mut *tx).await?;
        connect_tags(&mut tx, product_id, names).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn paid_revenue(&self) -> Result<Decimal> {
        let sum = sqlx::query_scalar("SELECT COALESCE(SUM(total_price), 0) FROM orders WHERE payment_status = $1")
            .bind(PAYMENT_SUCCESS)
            .fetch_one(&self.pool)
            .await?;
        Ok(sum)
    }

    async fn customer_count(&self) -> Result<i64> {
        let n = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'USER'").fetch_one(&self.pool).await?;
        Ok(n)
    }

    async fn active_product_count(&self) -> Result<i64> {
        let n = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE NOT is_archived").fetch_one(&self.pool).await?;
        Ok(n)
    }

    async fn average_rating(&self) -> Result<Option<f64>> {
        let avg = sqlx::query_scalar("SELECT AVG(rating)::float8 FROM reviews").fetch_one(&self.pool).await?;
        Ok(avg)
    }

    async fn variants_below(&self, threshold: i32) -> Result<i64> {
        let n = sqlx::query_scalar("SELECT COUNT(*) FROM variants WHERE stock < $1").bind(threshold).fetch_one(&self.pool).await?;
        Ok(n)
    }

    async fn low_stock_variants(&self, threshold: i32, limit: i64) -> Result<Vec<LowStockRow>> {
        let rows = sqlx::query_as::<_, LowStockRow>(
            "SELECT p.title AS product_title, v.variant_type, v.value AS variant_value, v.stock \
             FROM variants v JOIN products p ON p.id = v.product_id \
             WHERE v.stock < $1 ORDER BY v.stock ASC, v.id LIMIT $2",
        )
        .bind(threshold)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn paid_orders_since(&self, since: DateTime<Utc>) -> Result<Vec<RevenueRow>> {
        let rows = sqlx::query_as::<_, RevenueRow>("SELECT total_price, created_at FROM orders WHERE payment_status = $1 AND created_at >= $2")
            .bind(PAYMENT_SUCCESS)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn category_stock(&self) -> Result<Vec<CategoryStock>> {
        let rows = sqlx::query_as::<_, CategoryStock>(
            "SELECT c.id, c.name, COALESCE(SUM(v.stock), 0)::int8 AS stock \
             FROM categories c \
             LEFT JOIN products p ON p.category_id = c.id \
             LEFT JOIN variants v ON v.product_id = p.id \
             GROUP BY c.id, c.name ORDER BY c.id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn reviews_at_most(&self, max_rating: i32, limit: i64) -> Result<Vec<ReviewRow>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT r.id, r.rating, r.comment, r.created_at, p.title AS product_title, \
             u.name AS user_name, u.first_name, u.last_name \
             FROM reviews r JOIN products p ON p.id = r.product_id JOIN users u ON u.id = r.user_id \
             WHERE r.rating <= $1 ORDER BY r.created_at DESC LIMIT $2",
        )
        .bind(max_rating)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn orders(&self, search: Option<&str>, limit: Option<i64>) -> Result<Vec<OrderRow>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT o.id, o.total_price, o.status, o.payment_status, o.tx_ref, o.created_at, \
             u.name AS customer_name, u.first_name, u.last_name, u.email, \
             (SELECT COUNT(*) FROM order_items i WHERE i.order_id = o.id) AS items_count \
             FROM orders o JOIN users u ON u.id = o.user_id \
             WHERE ($1::text IS NULL OR o.id::text ILIKE $1 ESCAPE '\\' OR o.tx_ref ILIKE $1 ESCAPE '\\' \
                    OR u.name ILIKE $1 ESCAPE '\\') \
             ORDER BY o.created_at DESC LIMIT $2",
        )
        .bind(search.map(like_pattern))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn customers(&self, search: Option<&str>) -> Result<Vec<CustomerRow>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT u.id, u.email, u.name, u.first_name, u.last_name, u.image, u.created_at, \
             COUNT(o.id) AS completed_orders, COALESCE(SUM(o.total_price), 0) AS completed_spend \
             FROM users u LEFT JOIN orders o ON o.user_id = u.id AND o.status = 'COMPLETED' \
             WHERE u.role = 'USER' AND ($1::text IS NULL OR u.name ILIKE $1 ESCAPE '\\' OR u.email ILIKE $1 ESCAPE '\\' \
                    OR u.first_name ILIKE $1 ESCAPE '\\' OR u.last_name ILIKE $1 ESCAPE '\\') \
             GROUP BY u.id ORDER BY u.created_at DESC",
        )
        .bind(search.map(like_pattern))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
