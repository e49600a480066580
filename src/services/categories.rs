//! Category administration
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use super::slug::generate_slug;
use crate::domain::aggregates::{Category, CategoryInput, CategoryListing, CategoryOption, CategoryUpdate};
use crate::domain::events::CatalogEvent;
use crate::revalidate::Revalidator;
use crate::store::{SlugScope, Store};
use crate::{AdminError, Result};

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn Store>,
    revalidator: Revalidator,
}

impl CategoryService {
    pub fn new(store: Arc<dyn Store>, revalidator: Revalidator) -> Self {
        Self { store, revalidator }
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category> {
        let input = input.trimmed();
        input.validate()?;

        if self.store.find_category_by_name(&input.name).await?.is_some() {
            return Err(AdminError::DuplicateCategoryName);
        }
        let slug = generate_slug(&*self.store, SlugScope::Category, &input.name, None).await?;
        let category = self.store.insert_category(&input.name, slug.as_str()).await?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "category created");
        self.revalidator.publish(CatalogEvent::CategoryCreated { category_id: category.id }).await;
        Ok(category)
    }

    /// Renames a category and regenerates its slug from the new name.
    pub async fn update(&self, id: Uuid, input: CategoryUpdate) -> Result<Category> {
        let input = input.trimmed();
        input.validate()?;

        if let Some(existing) = self.store.find_category_by_name(&input.name).await? {
            if existing.id != id {
                return Err(AdminError::DuplicateCategoryName);
            }
        }
        let slug = generate_slug(&*self.store, SlugScope::Category, &input.name, Some(id)).await?;
        let category = self
            .store
            .update_category(id, &input.name, slug.as_str(), input.is_active)
            .await?
            .ok_or(AdminError::NotFound("Category"))?;

        tracing::info!(category_id = %id, slug = %category.slug, active = category.is_active, "category updated");
        self.revalidator.publish(CatalogEvent::CategoryUpdated { category_id: id }).await;
        Ok(category)
    }

    /// Refuses while any product still references the category.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        match self.store.category_product_count(id).await? {
            None => return Err(AdminError::NotFound("Category")),
            Some(count) if count > 0 => return Err(AdminError::CategoryInUse(count)),
            Some(_) => {}
        }
        if !self.store.delete_category(id).await? {
            return Err(AdminError::NotFound("Category"));
        }

        tracing::info!(category_id = %id, "category deleted");
        self.revalidator.publish(CatalogEvent::CategoryDeleted { category_id: id }).await;
        Ok(())
    }

    /// Newest first with product counts. Storage failures yield an empty list.
    pub async fn list(&self) -> Vec<CategoryListing> {
        self.store.list_categories().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to list categories");
            Vec::new()
        })
    }

    /// `{id, name}` pairs for select inputs.
    pub async fn options(&self) -> Vec<CategoryOption> {
        self.store.category_options().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load category options");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::draft;
    use crate::store::MemoryStore;

    fn service() -> (CategoryService, Arc<MemoryStore>, Revalidator) {
        let store = Arc::new(MemoryStore::new());
        let revalidator = Revalidator::new("test.revalidate");
        (CategoryService::new(store.clone(), revalidator.clone()), store, revalidator)
    }

    fn named(name: &str) -> CategoryInput {
        CategoryInput { name: name.into() }
    }

    #[tokio::test]
    async fn test_create_trims_and_slugs() {
        let (svc, _, revalidator) = service();
        let mut rx = revalidator.subscribe();
        let c = svc.create(named("  Smart Home  ")).await.unwrap();
        assert_eq!(c.name, "Smart Home");
        assert_eq!(c.slug, "smart-home");
        assert!(c.is_active);
        assert_eq!(rx.recv().await.unwrap().path, "/admin/categories");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (svc, _, _) = service();
        let err = svc.create(named("   ")).await.unwrap_err();
        assert_eq!(err.to_string(), "Category name is required");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_case_insensitive() {
        let (svc, _, _) = service();
        svc.create(named("Audio")).await.unwrap();
        let err = svc.create(named("aUdIo")).await.unwrap_err();
        assert!(matches!(err, AdminError::DuplicateCategoryName));
        assert_eq!(err.to_string(), "A category with this name already exists.");
    }

    #[tokio::test]
    async fn test_update_regenerates_slug_and_toggles_active() {
        let (svc, _, _) = service();
        let c = svc.create(named("Audio")).await.unwrap();
        let updated = svc.update(c.id, CategoryUpdate { name: "Hi-Fi Audio".into(), is_active: false }).await.unwrap();
        assert_eq!(updated.slug, "hi-fi-audio");
        assert!(!updated.is_active);

        // Saving without a rename keeps the slug.
        let same = svc.update(c.id, CategoryUpdate { name: "Hi-Fi Audio".into(), is_active: true }).await.unwrap();
        assert_eq!(same.slug, "hi-fi-audio");
    }

    #[tokio::test]
    async fn test_update_into_taken_name() {
        let (svc, _, _) = service();
        svc.create(named("Audio")).await.unwrap();
        let video = svc.create(named("Video")).await.unwrap();
        let err = svc.update(video.id, CategoryUpdate { name: "audio".into(), is_active: true }).await.unwrap_err();
        assert!(matches!(err, AdminError::DuplicateCategoryName));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let (svc, _, _) = service();
        let err = svc.update(Uuid::new_v4(), CategoryUpdate { name: "Ghost".into(), is_active: true }).await.unwrap_err();
        assert!(matches!(err, AdminError::NotFound("Category")));
    }

    #[tokio::test]
    async fn test_delete_blocked_while_products_reference_it() {
        let (svc, store, _) = service();
        let c = svc.create(named("Audio")).await.unwrap();
        for slug in ["a", "b", "c"] {
            store.insert_product(&draft(c.id, slug, &[1])).await.unwrap();
        }

        let err = svc.delete(c.id).await.unwrap_err();
        assert!(matches!(err, AdminError::CategoryInUse(3)));
        assert_eq!(err.to_string(), "Cannot delete: 3 products are still in this category.");
        assert_eq!(svc.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_empty_category() {
        let (svc, _, _) = service();
        let c = svc.create(named("Audio")).await.unwrap();
        svc.delete(c.id).await.unwrap();
        assert!(svc.list().await.is_empty());
        assert!(matches!(svc.delete(c.id).await, Err(AdminError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_options_sorted_by_name() {
        let (svc, _, _) = service();
        for name in ["Video", "Audio", "Cameras"] {
            svc.create(named(name)).await.unwrap();
        }
        let names: Vec<_> = svc.options().await.into_iter().map(|o| o.name).collect();
        assert_eq!(names, ["Audio", "Cameras", "Video"]);
    }
}
