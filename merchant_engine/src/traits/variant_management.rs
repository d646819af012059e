use thiserror::Error;

use super::{constraint_failure, ConstraintFailure, ProductApiError, ProductManagement};
use crate::{
    db_types::{NewVariant, ProductId, ProductVariant, VariantDetail, VariantId, VariantUpdate},
    merchant_api::errors::ValidationError,
};

#[derive(Debug, Clone, Error)]
pub enum VariantApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("{0}")]
    ValidationError(#[from] ValidationError),
    #[error("Product not found")]
    ProductNotFound(ProductId),
    #[error("Product variant not found")]
    VariantNotFound(VariantId),
    #[error("The variant update does not change anything")]
    NoOp,
}

impl From<sqlx::Error> for VariantApiError {
    fn from(e: sqlx::Error) -> Self {
        match constraint_failure(&e) {
            Some(ConstraintFailure::InvalidReference(msg)) => Self::InvalidReference(msg),
            Some(ConstraintFailure::Violation(msg)) => Self::ConstraintViolation(msg),
            None => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<ProductApiError> for VariantApiError {
    fn from(e: ProductApiError) -> Self {
        match e {
            ProductApiError::ProductNotFound(id) => Self::ProductNotFound(id),
            ProductApiError::InvalidReference(msg) => Self::InvalidReference(msg),
            ProductApiError::ConstraintViolation(msg) => Self::ConstraintViolation(msg),
            ProductApiError::ValidationError(e) => Self::ValidationError(e),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

/// Single-variant persistence. Variants always belong to a product, so every variant backend is also a
/// [`ProductManagement`] backend.
#[allow(async_fn_in_trait)]
pub trait VariantManagement: ProductManagement {
    /// Inserts a variant for an existing product. The caller is responsible for checking that the product exists.
    async fn insert_variant(&self, product_id: &ProductId, variant: NewVariant)
        -> Result<ProductVariant, VariantApiError>;

    async fn fetch_variant(&self, variant_id: &VariantId) -> Result<Option<VariantDetail>, VariantApiError>;

    /// All variants of the product joined with their color and size, newest first.
    async fn fetch_variants_for_product(&self, product_id: &ProductId) -> Result<Vec<VariantDetail>, VariantApiError>;

    /// Applies the fields present in `update`. Returns `None` if the variant does not exist.
    async fn update_variant(
        &self,
        variant_id: &VariantId,
        update: VariantUpdate,
    ) -> Result<Option<ProductVariant>, VariantApiError>;

    /// Returns the deleted variant, or `None` if it did not exist.
    async fn delete_variant(&self, variant_id: &VariantId) -> Result<Option<ProductVariant>, VariantApiError>;
}
