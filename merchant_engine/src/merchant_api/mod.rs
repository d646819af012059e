//! # Merchant console public API
//!
//! The `merchant_api` module exposes the programmatic API for the product catalog. Each API object wraps a backend that
//! implements the trait(s) it needs, so the store checks, product flows and variant flows could even be served by
//! different backends.
//!
//! * [`store_auth_api`] answers "is there a signed-in user, and do they own this store?".
//! * [`product_api`] creates, updates, reads, lists and deletes products with their images and variants.
//! * [`variant_api`] manages individual variants under a product.
//!
//! [`product_objects`] holds the request schemas, query filters and presentation types used by the APIs.
//!
//! # API usage
//!
//! ```rust,ignore
//! use merchant_engine::{ProductApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/merchant_console.db", 5).await?;
//! let api = ProductApi::new(db);
//! let products = api.list_products(ProductQueryFilter::for_store(store_id).featured_only()).await?;
//! ```
pub mod errors;
pub mod product_api;
pub mod product_objects;
pub mod store_auth_api;
pub mod variant_api;
