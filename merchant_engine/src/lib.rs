//! Merchant Console Engine
//!
//! The engine holds the catalog logic behind the merchant dashboard: stores own products, products own images and
//! variants, and only a store's owner may change its catalog. It is provider-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`mod@traits`] and the SQLite backend). The traits define what a backend must do; [`SqliteDatabase`]
//!    implements all of them. The record types in [`db_types`] are public, the low-level queries are not.
//! 2. The public API ([`mod@merchant_api`]): [`StoreAuthApi`], [`ProductApi`] and [`VariantApi`]. These validate input,
//!    apply store scoping and delegate persistence to the backend.
pub mod db_types;
pub mod helpers;
pub mod merchant_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use merchant_api::{
    errors::ValidationError,
    product_api::ProductApi,
    product_objects,
    store_auth_api::StoreAuthApi,
    variant_api::VariantApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    ProductApiError,
    ProductManagement,
    StoreAuthError,
    StoreManagement,
    VariantApiError,
    VariantManagement,
};
