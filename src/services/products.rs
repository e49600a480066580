//! Product administration
//!
//! Create and update run the full form validation before touching storage.
//! An update rewrites the product row and replaces its images, variants and
//! tag links in a single transaction, so a failed update leaves the previous
//! version intact.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::search_term;
use super::slug::generate_slug;
use crate::domain::aggregates::product::normalize_tags;
use crate::domain::aggregates::{ProductDetail, ProductImage, ProductInput, ProductListing, Tag};
use crate::domain::events::CatalogEvent;
use crate::domain::value_objects::Slug;
use crate::revalidate::Revalidator;
use crate::store::{ProductFilter, SlugScope, Store};
use crate::{AdminError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub data: Vec<ProductListing>,
    pub total_count: i64,
    pub total_pages: i64,
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn Store>,
    revalidator: Revalidator,
}

impl ProductService {
    pub fn new(store: Arc<dyn Store>, revalidator: Revalidator) -> Self {
        Self { store, revalidator }
    }

    /// Every product, newest first.
    pub async fn list(&self) -> Vec<ProductListing> {
        self.store.list_products(&ProductFilter::default()).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to list products");
            Vec::new()
        })
    }

    /// One page of the admin table, searched over title and id.
    pub async fn admin_list(&self, params: AdminListParams) -> ProductPage {
        let page = params.page.unwrap_or(1).max(1);
        let size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let search = search_term(params.search.as_deref());
        let filter = ProductFilter {
            search: search.clone(),
            limit: Some(i64::from(size)),
            offset: i64::from(page - 1) * i64::from(size),
        };

        let store = &*self.store;
        match tokio::try_join!(store.list_products(&filter), store.count_products(search.as_deref())) {
            Ok((data, total_count)) => {
                let size = i64::from(size);
                ProductPage { data, total_count, total_pages: (total_count + size - 1) / size }
            }
            Err(e) => {
                tracing::error!(error = %e, page, "failed to page products");
                ProductPage::default()
            }
        }
    }

    pub async fn create(&self, input: ProductInput) -> Result<ProductDetail> {
        input.validate()?;
        let slug = match input.requested_slug()? {
            Some(slug) => slug,
            None => generate_slug(&*self.store, SlugScope::Product, &input.title, None).await?,
        };
        let draft = input.into_draft(slug)?;
        let detail = self.store.insert_product(&draft).await?;

        tracing::info!(product_id = %detail.product.id, slug = %detail.product.slug, variants = detail.variants.len(), "product created");
        self.revalidator.publish(CatalogEvent::ProductCreated { product_id: detail.product.id }).await;
        Ok(detail)
    }

    /// Replaces the product and everything it owns. Without an explicit slug
    /// the current one is kept.
    pub async fn update(&self, id: Uuid, input: ProductInput) -> Result<ProductDetail> {
        input.validate()?;
        let current = self.store.find_product(id).await?.ok_or(AdminError::NotFound("Product"))?;
        let slug = match input.requested_slug()? {
            Some(slug) => slug,
            None => match Slug::parse(&current.slug) {
                Ok(slug) => slug,
                Err(_) => generate_slug(&*self.store, SlugScope::Product, &input.title, Some(id)).await?,
            },
        };
        let draft = input.into_draft(slug)?;
        let detail = self.store.replace_product(id, &draft).await?.ok_or(AdminError::NotFound("Product"))?;

        tracing::info!(product_id = %id, slug = %detail.product.slug, variants = detail.variants.len(), "product updated");
        self.revalidator
            .publish(CatalogEvent::ProductUpdated { product_id: id, slug: detail.product.slug.clone() })
            .await;
        Ok(detail)
    }

    /// Reviews go with the product; past order lines keep their rows but lose the link.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete_product(id).await? {
            return Err(AdminError::NotFound("Product"));
        }
        tracing::info!(product_id = %id, "product deleted");
        self.revalidator.publish(CatalogEvent::ProductDeleted { product_id: id }).await;
        Ok(())
    }

    pub async fn set_archived(&self, id: Uuid, archived: bool) -> Result<()> {
        if !self.store.set_product_archived(id, archived).await? {
            return Err(AdminError::NotFound("Product"));
        }
        tracing::info!(product_id = %id, archived, "product archive flag set");
        self.revalidator.publish(CatalogEvent::ProductArchiveToggled { product_id: id, archived }).await;
        Ok(())
    }

    /// Gallery images in display order.
    pub async fn images(&self, id: Uuid) -> Vec<ProductImage> {
        self.store.product_images(id).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, product_id = %id, "failed to load product images");
            Vec::new()
        })
    }

    pub async fn tags(&self, id: Uuid) -> Vec<Tag> {
        self.store.product_tags(id).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, product_id = %id, "failed to load product tags");
            Vec::new()
        })
    }

    /// Makes the product's tags exactly `names`, creating tags that do not exist yet.
    pub async fn sync_tags(&self, id: Uuid, names: Vec<String>) -> Result<()> {
        let names = normalize_tags(names);
        if !self.store.sync_product_tags(id, &names).await? {
            return Err(AdminError::NotFound("Product"));
        }
        tracing::debug!(product_id = %id, tags = names.len(), "product tags synced");
        Ok(())
    }
}
