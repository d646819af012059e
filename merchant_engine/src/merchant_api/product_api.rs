//! Product creation, update, listing and deletion.
use std::fmt::Debug;

use log::{debug, info, trace};

use crate::{
    db_types::{NewProduct, Product, ProductDetail, ProductId, ProductUpdate, StoreId},
    merchant_api::product_objects::{validate_product_fields, ProductColumn, ProductQueryFilter},
    traits::{ProductApiError, ProductManagement},
};

/// `ProductApi` is the product writer and reader for a store's catalog.
///
/// Callers are expected to have authorized the acting user against the store (see
/// [`crate::StoreAuthApi::authorize`]) before calling any of the mutating methods.
pub struct ProductApi<B> {
    db: B,
}

impl<B: Debug> Debug for ProductApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProductApi ({:?})", self.db)
    }
}

impl<B> ProductApi<B>
where B: ProductManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Creates a product together with all of its images and variants in a single write.
    pub async fn create_product(&self, product: NewProduct) -> Result<ProductDetail, ProductApiError> {
        validate_product_fields(&product.name, product.price, &product.images, &product.variants)?;
        let (images, variants) = (product.images.len(), product.variants.len());
        let detail = self.db.insert_product(product).await?;
        info!(
            "📦️ Product {} created in store {} with {images} images and {variants} variants",
            detail.product.id, detail.product.store_id
        );
        Ok(detail)
    }

    /// Updates a product. Images are replaced wholesale; the variants in the update are added to the ones the product
    /// already has.
    pub async fn update_product(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
        update: ProductUpdate,
    ) -> Result<ProductDetail, ProductApiError> {
        validate_product_fields(&update.name, update.price, &update.images, &update.variants)?;
        self.product_in_store(store_id, product_id).await?;
        let detail = self.db.update_product(product_id, update).await?;
        info!("📦️ Product {product_id} updated. It now has {} variants", detail.variants.len());
        Ok(detail)
    }

    /// Fetches a single product with its category, images and variants.
    pub async fn product(&self, store_id: &StoreId, product_id: &ProductId) -> Result<ProductDetail, ProductApiError> {
        match self.db.fetch_product_detail(product_id).await? {
            Some(detail) if &detail.product.store_id == store_id => Ok(detail),
            _ => Err(ProductApiError::ProductNotFound(product_id.clone())),
        }
    }

    /// The public product listing. Archived products are never included, whatever the filter says.
    pub async fn list_products(&self, query: ProductQueryFilter) -> Result<Vec<ProductDetail>, ProductApiError> {
        let query = query.exclude_archived();
        trace!("📦️ Listing products. {query}");
        self.db.search_products(query).await
    }

    /// Every product in the store, archived ones included, formatted for the dashboard table.
    pub async fn dashboard_products(&self, store_id: &StoreId) -> Result<Vec<ProductColumn>, ProductApiError> {
        let products = self.db.search_products(ProductQueryFilter::for_store(store_id.clone())).await?;
        Ok(products.iter().map(ProductColumn::from).collect())
    }

    /// Runs the deletion workflow: every variant is purged, then the product itself is removed.
    pub async fn delete_product(
        &self,
        store_id: &StoreId,
        product_id: &ProductId,
    ) -> Result<ProductDetail, ProductApiError> {
        self.product_in_store(store_id, product_id).await?;
        let deleted = self.db.delete_product(product_id).await?;
        info!("📦️ Product {product_id} and its {} variants deleted", deleted.variants.len());
        Ok(deleted)
    }

    async fn product_in_store(&self, store_id: &StoreId, product_id: &ProductId) -> Result<Product, ProductApiError> {
        match self.db.fetch_product(product_id).await? {
            Some(p) if &p.store_id == store_id => Ok(p),
            Some(_) => {
                debug!("📦️ Product {product_id} exists, but not in store {store_id}");
                Err(ProductApiError::ProductNotFound(product_id.clone()))
            },
            None => Err(ProductApiError::ProductNotFound(product_id.clone())),
        }
    }
}
