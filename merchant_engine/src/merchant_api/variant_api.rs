use std::fmt::Debug;

use log::{debug, info};

use crate::{
    db_types::{NewVariant, Product, ProductId, ProductVariant, StoreId, VariantDetail, VariantId, VariantUpdate},
    merchant_api::errors::ValidationError,
    traits::{VariantApiError, VariantManagement},
};

/// `VariantApi` manages the individual variants of a product. Every call is scoped to a store and product: a variant
/// that belongs to another product is reported as not found.
pub struct VariantApi<B> {
    db: B,
}

impl<B: Debug> Debug for VariantApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VariantApi ({:?})", self.db)
    }
}

impl<B> VariantApi<B>
where B: VariantManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub async fn create_variant(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        variant: NewVariant,
    ) -> Result<ProductVariant, VariantApiError> {
        if variant.quantity < 0 {
            return Err(ValidationError::invalid("Quantity cannot be negative").into());
        }
        self.parent_product(store_id, product_id).await?;
        let variant = self.db.insert_variant(product_id, variant).await?;
        info!("🎨️ Variant {} added to product {product_id}", variant.id);
        Ok(variant)
    }

    pub async fn variants_for_product(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<Vec<VariantDetail>, VariantApiError> {
        self.parent_product(store_id, product_id).await?;
        self.db.fetch_variants_for_product(product_id).await
    }

    pub async fn variant(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        variant_id: &VariantId,
    ) -> Result<VariantDetail, VariantApiError> {
        self.parent_product(store_id, product_id).await?;
        match self.db.fetch_variant(variant_id).await? {
            Some(v) if &v.variant.product_id == product_id => Ok(v),
            _ => Err(VariantApiError::VariantNotFound(variant_id.clone())),
        }
    }

    pub async fn update_variant(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        variant_id: &VariantId,
        update: VariantUpdate,
    ) -> Result<ProductVariant, VariantApiError> {
        if update.is_empty() {
            return Err(VariantApiError::NoOp);
        }
        if update.quantity.is_some_and(|q| q < 0) {
            return Err(ValidationError::invalid("Quantity cannot be negative").into());
        }
        self.variant(store_id, product_id, variant_id).await?;
        let variant = self
            .db
            .update_variant(variant_id, update)
            .await?
            .ok_or_else(|| VariantApiError::VariantNotFound(variant_id.clone()))?;
        info!("🎨️ Variant {variant_id} updated");
        Ok(variant)
    }

    pub async fn delete_variant(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        variant_id: &VariantId,
    ) -> Result<ProductVariant, VariantApiError> {
        self.variant(store_id, product_id, variant_id).await?;
        let variant = self
            .db
            .delete_variant(variant_id)
            .await?
            .ok_or_else(|| VariantApiError::VariantNotFound(variant_id.clone()))?;
        info!("🎨️ Variant {variant_id} deleted from product {product_id}");
        Ok(variant)
    }

    async fn parent_product(&self, store_id: &StoreId, product_id: &ProductId) -> Result<Product, VariantApiError> {
        match self.db.fetch_product(product_id).await? {
            Some(p) if &p.store_id == store_id => Ok(p),
            _ => {
                debug!("🎨️ Product {product_id} not found in store {store_id}");
                Err(VariantApiError::ProductNotFound(product_id.clone()))
            },
        }
    }
}
