#![allow(dead_code)]

//! Reference data helpers. Database setup and teardown come from `merchant_engine::test_utils`.
use merchant_engine::{
    db_types::{CategoryId, ColorId, NewCategory, NewColor, NewSize, NewStore, SizeId, StoreId, UserId},
    SqliteDatabase,
};
pub use merchant_engine::test_utils::prepare_env::{prepare_test_db, random_db_path, tear_down};

pub async fn create_store(db: &SqliteDatabase, store: &str, owner: &str) {
    let store_id = StoreId::from(store);
    db.create_store(NewStore::new(store, UserId::from(owner)).with_id(store_id)).await.expect("Error creating store");
}

pub async fn create_category(db: &SqliteDatabase, store: &str, category: &str) {
    let new_category = NewCategory::new(StoreId::from(store), category).with_id(CategoryId::from(category));
    db.create_category(new_category).await.expect("Error creating category");
}

pub async fn create_color(db: &SqliteDatabase, store: &str, color: &str, value: &str) {
    let new_color = NewColor::new(StoreId::from(store), color, value).with_id(ColorId::from(color));
    db.create_color(new_color).await.expect("Error creating color");
}

pub async fn create_size(db: &SqliteDatabase, store: &str, size: &str, value: &str) {
    let new_size = NewSize::new(StoreId::from(store), size, value).with_id(SizeId::from(size));
    db.create_size(new_size).await.expect("Error creating size");
}
