//! Catalog events and the rendered pages they invalidate
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ADMIN_CATEGORIES_PATH: &str = "/admin/categories";
pub const ADMIN_PRODUCTS_PATH: &str = "/admin/products";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatalogEvent {
    CategoryCreated { category_id: Uuid },
    CategoryUpdated { category_id: Uuid },
    CategoryDeleted { category_id: Uuid },
    ProductCreated { product_id: Uuid },
    ProductUpdated { product_id: Uuid, slug: String },
    ProductDeleted { product_id: Uuid },
    ProductArchiveToggled { product_id: Uuid, archived: bool },
}

impl CatalogEvent {
    /// Cached page paths that must be re-rendered after this event.
    pub fn stale_paths(&self) -> Vec<String> {
        match self {
            Self::CategoryCreated { .. } | Self::CategoryUpdated { .. } | Self::CategoryDeleted { .. } => {
                vec![ADMIN_CATEGORIES_PATH.to_string()]
            }
            Self::ProductUpdated { slug, .. } => vec![ADMIN_PRODUCTS_PATH.to_string(), format!("/products/{slug}")],
            Self::ProductCreated { .. } | Self::ProductDeleted { .. } | Self::ProductArchiveToggled { .. } => {
                vec![ADMIN_PRODUCTS_PATH.to_string()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_invalidates_detail_page() {
        let e = CatalogEvent::ProductUpdated { product_id: Uuid::nil(), slug: "iphone-15-pro".into() };
        assert_eq!(e.stale_paths(), vec!["/admin/products".to_string(), "/products/iphone-15-pro".to_string()]);
        let e = CatalogEvent::CategoryDeleted { category_id: Uuid::nil() };
        assert_eq!(e.stale_paths(), vec!["/admin/categories".to_string()]);
    }
}
