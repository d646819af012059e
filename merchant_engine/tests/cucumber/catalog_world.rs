use std::collections::HashMap;

use cucumber::World;
use log::*;
use merchant_engine::{db_types::ProductId, ProductApi, SqliteDatabase, StoreAuthApi, VariantApi};

use crate::support::{prepare_test_db, random_db_path, tear_down};

#[derive(Default, Debug, World)]
pub struct CatalogWorld {
    pub system: Option<CatalogSystem>,
    /// Product ids, keyed by product name
    pub products: HashMap<String, ProductId>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
pub struct CatalogSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub auth: StoreAuthApi<SqliteDatabase>,
    pub products: ProductApi<SqliteDatabase>,
    pub variants: VariantApi<SqliteDatabase>,
}

impl CatalogWorld {
    pub fn system(&self) -> &CatalogSystem {
        self.system.as_ref().expect("Catalog system not initialised")
    }

    pub fn product_id(&self, name: &str) -> ProductId {
        self.products.get(name).cloned().unwrap_or_else(|| panic!("No product named {name} has been created"))
    }
}

impl CatalogSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_db(&url).await;
        debug!("🚀️ Created database: {url}");
        let auth = StoreAuthApi::new(db.clone());
        let products = ProductApi::new(db.clone());
        let variants = VariantApi::new(db.clone());
        Self { db_path: url, db, auth, products, variants }
    }

    pub async fn tear_down(self) {
        debug!("🚀️ Removing scenario database {}", self.db_path);
        tear_down(self.db).await;
    }
}
