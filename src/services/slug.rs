//! Slug derivation with collision retries

use uuid::Uuid;

use crate::domain::value_objects::Slug;
use crate::store::{SlugScope, Store};
use crate::{AdminError, Result};

/// Random candidates tried before giving up and letting the unique index decide.
const MAX_SUFFIX_ATTEMPTS: usize = 8;

/// Derives a slug for `name` that is free in `scope`. `exclude` is the id of
/// the record being renamed, so it never collides with itself. On collision a
/// `-xxxx` suffix (two random bytes, hex) is appended and re-checked.
pub async fn generate_slug(store: &dyn Store, scope: SlugScope, name: &str, exclude: Option<Uuid>) -> Result<Slug> {
    let base = Slug::from_name(name).map_err(|e| AdminError::validation(e.to_string()))?;
    if !store.slug_taken(scope, base.as_str(), exclude).await? {
        return Ok(base);
    }

    let mut candidate = base.with_suffix(&random_suffix());
    for _ in 1..MAX_SUFFIX_ATTEMPTS {
        if !store.slug_taken(scope, candidate.as_str(), exclude).await? {
            return Ok(candidate);
        }
        candidate = base.with_suffix(&random_suffix());
    }
    tracing::warn!(base = %base, candidate = %candidate, "slug suffixes exhausted");
    Ok(candidate)
}

fn random_suffix() -> String {
    let bytes: [u8; 2] = rand::random();
    format!("{:02x}{:02x}", bytes[0], bytes[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn is_suffixed(slug: &str, base: &str) -> bool {
        slug.strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|hex| hex.len() == 4 && hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)))
    }

    #[tokio::test]
    async fn test_free_name_gives_base_slug() {
        let store = MemoryStore::new();
        let slug = generate_slug(&store, SlugScope::Category, "Smart Home Electronics", None).await.unwrap();
        assert_eq!(slug.as_str(), "smart-home-electronics");
    }

    #[tokio::test]
    async fn test_collision_appends_hex_suffix() {
        let store = MemoryStore::new();
        store.insert_category("Smart Home Electronics", "smart-home-electronics").await.unwrap();
        let slug = generate_slug(&store, SlugScope::Category, "smart home electronics", None).await.unwrap();
        assert_ne!(slug.as_str(), "smart-home-electronics");
        assert!(is_suffixed(slug.as_str(), "smart-home-electronics"), "{slug}");
    }

    #[tokio::test]
    async fn test_renaming_self_keeps_slug() {
        let store = MemoryStore::new();
        let c = store.insert_category("Books", "books").await.unwrap();
        let slug = generate_slug(&store, SlugScope::Category, "Books", Some(c.id)).await.unwrap();
        assert_eq!(slug.as_str(), "books");
    }

    #[tokio::test]
    async fn test_scopes_are_independent() {
        let store = MemoryStore::new();
        store.insert_category("Books", "books").await.unwrap();
        let slug = generate_slug(&store, SlugScope::Product, "Books", None).await.unwrap();
        assert_eq!(slug.as_str(), "books");
    }

    #[tokio::test]
    async fn test_unsluggable_name() {
        let store = MemoryStore::new();
        let err = generate_slug(&store, SlugScope::Category, "???", None).await.unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }

    #[test]
    fn test_suffix_shape() {
        for _ in 0..32 {
            assert!(is_suffixed(&format!("x-{}", random_suffix()), "x"));
        }
    }
}
