//! `SqliteDatabase` is a concrete implementation of a merchant console backend.
//!
//! It uses SQLite as the store and implements all the traits defined in the [`crate::traits`] module. Every multi-step
//! write runs inside a single transaction, so a failure part-way through leaves no trace.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate, migrate::MigrateError, SqlitePool};

use super::db::{catalog, db_url, images, new_pool, products, stores, variants};
use crate::{
    db_types::{
        Category,
        Color,
        DeletionStage,
        NewCategory,
        NewColor,
        NewProduct,
        NewSize,
        NewStore,
        NewVariant,
        Product,
        ProductDetail,
        ProductId,
        ProductUpdate,
        ProductVariant,
        Size,
        Store,
        StoreId,
        UserId,
        VariantDetail,
        VariantId,
        VariantUpdate,
    },
    merchant_api::product_objects::ProductQueryFilter,
    traits::{
        ProductApiError,
        ProductManagement,
        StoreAuthError,
        StoreManagement,
        VariantApiError,
        VariantManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl StoreManagement for SqliteDatabase {
    async fn fetch_store(&self, store_id: &StoreId) -> Result<Option<Store>, StoreAuthError> {
        let mut conn = self.pool.acquire().await?;
        let store = stores::fetch_store(store_id, &mut conn).await?;
        Ok(store)
    }

    async fn fetch_store_for_owner(
        &self,
        store_id: &StoreId,
        user_id: &UserId,
    ) -> Result<Option<Store>, StoreAuthError> {
        let mut conn = self.pool.acquire().await?;
        let store = stores::fetch_store_for_owner(store_id, user_id, &mut conn).await?;
        Ok(store)
    }
}

impl ProductManagement for SqliteDatabase {
    async fn insert_product(&self, product: NewProduct) -> Result<ProductDetail, ProductApiError> {
        let mut tx = self.pool.begin().await?;
        let row = products::insert_product(&product, &mut tx).await?;
        let images = images::insert_images(&row.id, &product.images, &mut tx).await?;
        trace!("🗃️ {} images saved for product {}", images.len(), row.id);
        for variant in &product.variants {
            variants::insert_variant(&row.id, variant, &mut tx).await?;
        }
        let detail = products::fetch_product_detail(row, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Product {} has been saved in the DB", detail.product.id);
        Ok(detail)
    }

    /// Both update steps share one transaction. If re-creating images or variants fails, the scalar changes and the
    /// image deletion are rolled back too.
    async fn update_product(
        &self,
        product_id: &ProductId,
        update: ProductUpdate,
    ) -> Result<ProductDetail, ProductApiError> {
        let mut tx = self.pool.begin().await?;
        // Step 1: scalar fields, and drop every existing image
        let row = products::update_product_fields(product_id, &update, &mut tx)
            .await?
            .ok_or_else(|| ProductApiError::ProductNotFound(product_id.clone()))?;
        let removed = images::delete_images_for_product(product_id, &mut tx).await?;
        trace!("🗃️ Removed {removed} images from product {product_id}");
        // Step 2: new images, plus additional variants
        images::insert_images(product_id, &update.images, &mut tx).await?;
        for variant in &update.variants {
            variants::insert_variant(product_id, variant, &mut tx).await?;
        }
        let detail = products::fetch_product_detail(row, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Product {product_id} has been updated in the DB");
        Ok(detail)
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<Option<Product>, ProductApiError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_product_detail(&self, product_id: &ProductId) -> Result<Option<ProductDetail>, ProductApiError> {
        let mut conn = self.pool.acquire().await?;
        match products::fetch_product(product_id, &mut conn).await? {
            Some(product) => Ok(Some(products::fetch_product_detail(product, &mut conn).await?)),
            None => Ok(None),
        }
    }

    async fn search_products(&self, query: ProductQueryFilter) -> Result<Vec<ProductDetail>, ProductApiError> {
        let mut conn = self.pool.acquire().await?;
        let rows = products::search_products(query, &mut conn).await?;
        let mut result = Vec::with_capacity(rows.len());
        for product in rows {
            result.push(products::fetch_product_detail(product, &mut conn).await?);
        }
        Ok(result)
    }

    async fn delete_product(&self, product_id: &ProductId) -> Result<ProductDetail, ProductApiError> {
        let mut tx = self.pool.begin().await?;
        let mut stage = DeletionStage::Requested;
        let product = products::fetch_product(product_id, &mut tx)
            .await?
            .ok_or_else(|| ProductApiError::ProductNotFound(product_id.clone()))?;
        let detail = products::fetch_product_detail(product, &mut tx).await?;
        for variant in &detail.variants {
            let id = &variant.variant.id;
            variants::delete_variant(id, &mut tx).await.map_err(|e| {
                warn!("🗃️ Could not delete variant {id} of product {product_id}. {e}");
                ProductApiError::deletion_failed(stage, e)
            })?;
        }
        stage = DeletionStage::VariantsPurged;
        trace!("🗃️ Product {product_id} reached stage {stage}");
        images::delete_images_for_product(product_id, &mut tx)
            .await
            .map_err(|e| ProductApiError::deletion_failed(stage, e))?;
        products::delete_product(product_id, &mut tx).await.map_err(|e| ProductApiError::deletion_failed(stage, e))?;
        tx.commit().await.map_err(|e| ProductApiError::deletion_failed(stage, e))?;
        stage = DeletionStage::Deleted;
        debug!("🗃️ Product {product_id} reached stage {stage}");
        Ok(detail)
    }
}

impl VariantManagement for SqliteDatabase {
    async fn insert_variant(
        &self,
        product_id: &ProductId,
        variant: NewVariant,
    ) -> Result<ProductVariant, VariantApiError> {
        let mut conn = self.pool.acquire().await?;
        let variant = variants::insert_variant(product_id, &variant, &mut conn).await?;
        Ok(variant)
    }

    async fn fetch_variant(&self, variant_id: &VariantId) -> Result<Option<VariantDetail>, VariantApiError> {
        let mut conn = self.pool.acquire().await?;
        let variant = variants::fetch_variant_detail(variant_id, &mut conn).await?;
        Ok(variant)
    }

    async fn fetch_variants_for_product(&self, product_id: &ProductId) -> Result<Vec<VariantDetail>, VariantApiError> {
        let mut conn = self.pool.acquire().await?;
        let variants = variants::fetch_variant_details_for_product(product_id, &mut conn).await?;
        Ok(variants)
    }

    async fn update_variant(
        &self,
        variant_id: &VariantId,
        update: VariantUpdate,
    ) -> Result<Option<ProductVariant>, VariantApiError> {
        let mut conn = self.pool.acquire().await?;
        let variant = variants::update_variant(variant_id, update, &mut conn).await?;
        Ok(variant)
    }

    async fn delete_variant(&self, variant_id: &VariantId) -> Result<Option<ProductVariant>, VariantApiError> {
        let mut conn = self.pool.acquire().await?;
        let variant = variants::delete_variant(variant_id, &mut conn).await?;
        Ok(variant)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using `MCS_DATABASE_URL` or the default database location.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date using the embedded migrations.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete");
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }

    //------------------------------------------  Provisioning  ------------------------------------------------------
    // Reference data is managed outside the product workflow. These helpers exist for seeding and tests.

    pub async fn create_store(&self, store: NewStore) -> Result<Store, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        stores::insert_store(store, &mut conn).await
    }

    pub async fn create_category(&self, category: NewCategory) -> Result<Category, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_category(category, &mut conn).await
    }

    pub async fn create_color(&self, color: NewColor) -> Result<Color, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_color(color, &mut conn).await
    }

    pub async fn create_size(&self, size: NewSize) -> Result<Size, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_size(size, &mut conn).await
    }
}
