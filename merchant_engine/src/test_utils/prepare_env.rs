//! Throwaway SQLite databases for tests.
use std::path::Path;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

use crate::{
    db_types::{CategoryId, ColorId, NewCategory, NewColor, NewSize, NewStore, SizeId, StoreId, UserId},
    SqliteDatabase,
};

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    run_migrations(url).await;
}

pub fn random_db_path() -> String {
    let dir = std::env::temp_dir();
    format!("sqlite://{}/mcs_test_{}.db", dir.display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 1).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
}

/// Creates a fresh, migrated database at `url` and opens a single-connection handle to it.
pub async fn prepare_test_db(url: &str) -> SqliteDatabase {
    prepare_test_env(url).await;
    SqliteDatabase::new_with_url(url, 1).await.expect("Error creating connection to database")
}

/// Closes the handle and removes the database file.
pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(&url).await.expect("Error dropping database");
    debug!("🚀️ Dropped database {url}");
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().expect("Database path is not valid UTF-8");
    if Sqlite::database_exists(p).await.unwrap_or(false) {
        if let Err(e) = Sqlite::drop_database(p).await {
            warn!("🚀️ Error dropping database {p}: {e:?}");
        }
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("🚀️ Created Sqlite database {p}");
}

/// The fixed reference data most tests start from: store `acme` owned by `alice`, with a `shirts` category, `red` and
/// `blue` colors and `m` and `l` sizes. Entity ids equal their names.
pub async fn seed_store(db: &SqliteDatabase) {
    let store = StoreId::from("acme");
    db.create_store(NewStore::new("Acme", UserId::from("alice")).with_id(store.clone()))
        .await
        .expect("Error creating store");
    db.create_category(NewCategory::new(store.clone(), "Shirts").with_id(CategoryId::from("shirts")))
        .await
        .expect("Error creating category");
    for (id, value) in [("red", "#ff0000"), ("blue", "#0000ff")] {
        db.create_color(NewColor::new(store.clone(), id, value).with_id(ColorId::from(id)))
            .await
            .expect("Error creating color");
    }
    for (id, value) in [("m", "Medium"), ("l", "Large")] {
        db.create_size(NewSize::new(store.clone(), id, value).with_id(SizeId::from(id)))
            .await
            .expect("Error creating size");
    }
    debug!("🚀️ Seeded store acme");
}
