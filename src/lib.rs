//! Storefront Admin
//!
//! Catalog and back-office service for a small storefront.
//!
//! ## Features
//! - Category management with slug bookkeeping
//! - Product catalog with variants, images and tags
//! - Order and customer listings
//! - Dashboard metrics, revenue windows and stock distribution

pub mod api;
pub mod config;
pub mod domain;
pub mod revalidate;
pub mod services;
pub mod store;

use std::borrow::Cow;

use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),

    #[error("A category with this name already exists.")]
    DuplicateCategoryName,

    #[error("Cannot delete: {0} products are still in this category.")]
    CategoryInUse(i64),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transaction timed out")]
    Timeout,
}

impl AdminError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for failures caused by the request itself rather than by infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::DuplicateCategoryName
                | Self::CategoryInUse(_)
                | Self::NotFound(_)
        )
    }
}

impl From<sqlx::Error> for AdminError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation() => {
                Self::Constraint(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut => Self::Timeout,
            _ => Self::Storage(e.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AdminError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        let msg = first_message(&errors).unwrap_or_else(|| "Invalid fields".to_string());
        Self::Validation(msg)
    }
}

/// First human-readable message in a (possibly nested) validation report.
/// Fields are visited in name order so the result is stable.
pub(crate) fn first_message(errors: &ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(name, _)| *name);
    fields.into_iter().find_map(|(field, kind)| match kind {
        ValidationErrorsKind::Field(list) => list.first().map(|e| match &e.message {
            Some(Cow::Borrowed(m)) => m.to_string(),
            Some(Cow::Owned(m)) => m.clone(),
            None => format!("Invalid {field}"),
        }),
        ValidationErrorsKind::Struct(inner) => first_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_message(inner)),
    })
}

pub type Result<T> = std::result::Result<T, AdminError>;
