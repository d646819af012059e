use merchant_common::helpers::{non_blank, parse_boolean_flag};
use merchant_engine::{
    db_types::{CategoryId, ProductId, StoreId, VariantId},
    product_objects::ProductQueryFilter,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePath {
    pub store_id: StoreId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPath {
    pub store_id: StoreId,
    pub product_id: ProductId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPath {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub variant_id: VariantId,
}

/// Query parameters accepted by the public product listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub category_id: Option<String>,
    /// `true` restricts the listing to featured products. Any other value lists everything.
    pub is_featured: Option<String>,
}

impl ProductListQuery {
    pub fn into_filter(self, store_id: StoreId) -> ProductQueryFilter {
        let mut filter = ProductQueryFilter::for_store(store_id);
        if let Some(category) = non_blank(self.category_id.as_deref()) {
            filter = filter.with_category_id(CategoryId::from(category));
        }
        if parse_boolean_flag(self.is_featured, false) {
            filter = filter.featured_only();
        }
        filter
    }
}
