use thiserror::Error;

use super::{constraint_failure, ConstraintFailure};
use crate::{
    db_types::{DeletionStage, NewProduct, Product, ProductDetail, ProductId, ProductUpdate},
    merchant_api::{errors::ValidationError, product_objects::ProductQueryFilter},
};

#[derive(Debug, Clone, Error)]
pub enum ProductApiError {
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
    #[error("Product deletion failed after reaching stage {stage}. {reason}")]
    DeletionFailed { stage: DeletionStage, reason: String },
}

impl ProductApiError {
    pub fn deletion_failed(stage: DeletionStage, e: sqlx::Error) -> Self {
        Self::DeletionFailed { stage, reason: e.to_string() }
    }
}

impl From<sqlx::Error> for ProductApiError {
    fn from(e: sqlx::Error) -> Self {
        match constraint_failure(&e) {
            Some(ConstraintFailure::InvalidReference(msg)) => Self::InvalidReference(msg),
            Some(ConstraintFailure::Violation(msg)) => Self::ConstraintViolation(msg),
            None => Self::DatabaseError(e.to_string()),
        }
    }
}

/// Persistence of products and their nested collections.
///
/// Products own images and variants. Backends must apply each of `insert_product`, `update_product` and
/// `delete_product` atomically: if any step fails, none of the changes made by that call may remain visible.
#[allow(async_fn_in_trait)]
pub trait ProductManagement {
    /// Inserts the product, all of its images and all of its variants. Returns the stored product joined with its
    /// category, images and variants.
    async fn insert_product(&self, product: NewProduct) -> Result<ProductDetail, ProductApiError>;

    /// Applies the update in two steps:
    /// 1. overwrite the scalar fields and delete every image of the product,
    /// 2. insert the new images and append the new variants.
    ///
    /// Returns [`ProductApiError::ProductNotFound`] if the product does not exist.
    async fn update_product(
        &self,
        product_id: &ProductId,
        update: ProductUpdate,
    ) -> Result<ProductDetail, ProductApiError>;

    async fn fetch_product(&self, product_id: &ProductId) -> Result<Option<Product>, ProductApiError>;

    async fn fetch_product_detail(&self, product_id: &ProductId) -> Result<Option<ProductDetail>, ProductApiError>;

    /// Products matching the filter, newest first.
    async fn search_products(&self, query: ProductQueryFilter) -> Result<Vec<ProductDetail>, ProductApiError>;

    /// Deletes every variant owned by the product, one at a time, then its images and finally the product itself.
    /// Returns the product as it was before deletion.
    async fn delete_product(&self, product_id: &ProductId) -> Result<ProductDetail, ProductApiError>;
}
