//! Product Aggregate

use std::borrow::Cow;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::value_objects::Slug;
use crate::{AdminError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub title_price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub category_id: Uuid,
    pub main_image_url: String,
    pub is_featured: bool,
    pub is_archived: bool,
    pub colors: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub url: String,
    pub key: String,
    pub alt_text: Option<String>,
    #[sqlx(rename = "position")]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: Uuid,
    pub product_id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "variant_type")]
    pub kind: String,
    pub value: String,
    pub price: Decimal,
    pub stock: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

/// A product with everything it exclusively owns, as returned from a write.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub variants: Vec<Variant>,
    pub tags: Vec<Tag>,
    pub total_stock: i64,
}

/// Catalog table row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: String,
    pub variants: Vec<Variant>,
    pub tags: Vec<Tag>,
    pub review_count: i64,
    pub total_stock: i64,
}

pub fn total_stock(variants: &[Variant]) -> i64 {
    variants.iter().map(|v| i64::from(v.stock)).sum()
}

// =============================================================================
// Form payload
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 2, message = "Title too short"))]
    pub title: String,
    #[validate(length(min = 10, message = "Description too short"))]
    pub description: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[validate(custom = "validate_title_price")]
    pub title_price: Decimal,
    #[serde(default)]
    pub discounted_price: Option<Decimal>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category_id: String,
    #[validate(url(message = "Main image must be a valid URL"))]
    pub main_image_url: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    #[validate]
    pub images: Vec<ImageInput>,
    #[serde(default)]
    #[validate]
    pub variants: Vec<VariantInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    #[validate(url(message = "Valid URL is required"))]
    pub url: String,
    #[validate(length(min = 1, message = "Image key is required"))]
    pub key: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VariantInput {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Type required (e.g. Storage)"))]
    pub kind: String,
    #[validate(length(min = 1, message = "Value required (e.g. 1TB)"))]
    pub value: String,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    #[validate(custom = "validate_variant_price")]
    pub price: Decimal,
}

fn price_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut e = ValidationError::new(code);
    e.message = Some(Cow::Borrowed(msg));
    e
}

fn validate_title_price(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if *price < Decimal::new(1, 2) {
        return Err(price_error("min_price", "Price must be at least 0.01"));
    }
    Ok(())
}

fn validate_variant_price(price: &Decimal) -> std::result::Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(price_error("negative_price", "Variant price cannot be negative"));
    }
    Ok(())
}

/// Validated, normalized write set for one product and everything it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub title_price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub category_id: Uuid,
    pub main_image_url: String,
    pub is_featured: bool,
    pub is_archived: bool,
    pub colors: Vec<String>,
    pub images: Vec<ImageDraft>,
    pub variants: Vec<VariantDraft>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageDraft {
    pub url: String,
    pub key: String,
    pub alt_text: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantDraft {
    pub kind: String,
    pub value: String,
    pub price: Decimal,
    pub stock: i32,
}

impl ProductInput {
    /// Explicit slug from the form, if the admin typed one.
    pub fn requested_slug(&self) -> Result<Option<Slug>> {
        match self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Slug::parse(raw).map(Some).map_err(|e| AdminError::validation(e.to_string())),
            None => Ok(None),
        }
    }

    /// Consumes an already-validated payload. Tag names are trimmed and de-duplicated.
    pub fn into_draft(self, slug: Slug) -> Result<ProductDraft> {
        let category_id = Uuid::parse_str(self.category_id.trim()).map_err(|_| AdminError::validation("Unknown category"))?;

        Ok(ProductDraft {
            title: self.title,
            slug: slug.into_string(),
            description: self.description,
            title_price: self.title_price,
            discounted_price: self.discounted_price,
            category_id,
            main_image_url: self.main_image_url,
            is_featured: self.is_featured,
            is_archived: self.is_archived,
            colors: self.colors,
            images: self
                .images
                .into_iter()
                .map(|img| ImageDraft { url: img.url, key: img.key, alt_text: img.alt_text.filter(|a| !a.trim().is_empty()), order: img.order })
                .collect(),
            variants: self
                .variants
                .into_iter()
                .map(|v| VariantDraft { kind: v.kind, value: v.value, price: v.price, stock: v.stock })
                .collect(),
            tags: normalize_tags(self.tags),
        })
    }
}

pub fn normalize_tags(names: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && seen.insert(n.clone()))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input(category_id: Uuid) -> ProductInput {
        ProductInput {
            title: "Logitech G Pro Mouse".into(),
            description: "Wireless gaming mouse with HERO sensor.".into(),
            slug: None,
            title_price: Decimal::new(12999, 2),
            discounted_price: None,
            category_id: category_id.to_string(),
            main_image_url: "https://cdn.example.com/mouse.png".into(),
            is_featured: false,
            is_archived: false,
            tags: vec!["gaming".into(), " wireless ".into(), "gaming".into()],
            colors: vec!["black".into()],
            images: vec![ImageInput { url: "https://cdn.example.com/mouse-1.png".into(), key: "mouse-1".into(), alt_text: None, order: 0 }],
            variants: vec![
                VariantInput { kind: "Color".into(), value: "Black".into(), stock: 100, price: Decimal::new(12999, 2) },
                VariantInput { kind: "Color".into(), value: "White".into(), stock: 45, price: Decimal::new(12999, 2) },
            ],
        }
    }

    #[test]
    fn test_valid_input_converts_to_draft() {
        let category = Uuid::new_v4();
        let input = sample_input(category);
        assert!(input.validate().is_ok());
        let draft = input.into_draft(Slug::from_name("Logitech G Pro Mouse").unwrap()).unwrap();
        assert_eq!(draft.slug, "logitech-g-pro-mouse");
        assert_eq!(draft.category_id, category);
        assert_eq!(draft.tags, vec!["gaming".to_string(), "wireless".to_string()]);
        assert_eq!(draft.images[0].alt_text, None);
    }

    #[test]
    fn test_validation_messages() {
        let mut input = sample_input(Uuid::new_v4());
        input.title = "X".into();
        assert_eq!(AdminError::from(input.validate().unwrap_err()).to_string(), "Title too short");

        let mut input = sample_input(Uuid::new_v4());
        input.title_price = Decimal::ZERO;
        assert_eq!(AdminError::from(input.validate().unwrap_err()).to_string(), "Price must be at least 0.01");

        let mut input = sample_input(Uuid::new_v4());
        input.variants[1].stock = -1;
        assert_eq!(AdminError::from(input.validate().unwrap_err()).to_string(), "Stock cannot be negative");

        let mut input = sample_input(Uuid::new_v4());
        input.images[0].url = "not a url".into();
        assert_eq!(AdminError::from(input.validate().unwrap_err()).to_string(), "Valid URL is required");
    }

    #[test]
    fn test_bad_category_id_is_a_validation_error() {
        let mut input = sample_input(Uuid::new_v4());
        input.category_id = "cat-1".into();
        let err = input.into_draft(Slug::parse("x").unwrap()).unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }

    #[test]
    fn test_requested_slug() {
        let mut input = sample_input(Uuid::new_v4());
        assert_eq!(input.requested_slug().unwrap(), None);
        input.slug = Some("  ".into());
        assert_eq!(input.requested_slug().unwrap(), None);
        input.slug = Some("custom-slug".into());
        assert_eq!(input.requested_slug().unwrap().unwrap().as_str(), "custom-slug");
        input.slug = Some("Has Spaces".into());
        assert!(input.requested_slug().is_err());
    }

    #[test]
    fn test_total_stock() {
        let pid = Uuid::new_v4();
        let v = |stock| Variant { id: Uuid::new_v4(), product_id: pid, kind: "Size".into(), value: "M".into(), price: Decimal::ONE, stock };
        assert_eq!(total_stock(&[v(3), v(4)]), 7);
        assert_eq!(total_stock(&[]), 0);
    }
}
