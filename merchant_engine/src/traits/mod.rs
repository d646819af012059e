//! # Backend contracts
//!
//! The traits in this module define what a storage backend must provide to act as a catalog backend for the merchant
//! console. The public APIs in [`crate::merchant_api`] are generic over these traits, so any backend (or a mock)
//! implementing them can drive the whole product workflow.
//!
//! * [`StoreManagement`] answers ownership questions about stores. It is read-only.
//! * [`ProductManagement`] persists products together with their nested images and variants. Multi-step writes
//!   (create, update, delete) must be atomic.
//! * [`VariantManagement`] handles single-variant operations. Every variant backend is also a product backend, since
//!   variants cannot exist without a parent product.
mod product_management;
mod store_management;
mod variant_management;

pub use product_management::{ProductApiError, ProductManagement};
pub use store_management::{StoreAuthError, StoreManagement};
pub use variant_management::{VariantApiError, VariantManagement};

/// Classification of database failures that are caused by the caller's data rather than by the backend.
pub(crate) enum ConstraintFailure {
    InvalidReference(String),
    Violation(String),
}

pub(crate) fn constraint_failure(e: &sqlx::Error) -> Option<ConstraintFailure> {
    match e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            Some(ConstraintFailure::InvalidReference(db.message().to_string()))
        },
        sqlx::Error::Database(db) if db.is_check_violation() => {
            Some(ConstraintFailure::Violation(db.message().to_string()))
        },
        _ => None,
    }
}
