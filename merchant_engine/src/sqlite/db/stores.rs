use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{NewStore, Store, StoreId, UserId};

pub async fn insert_store(store: NewStore, conn: &mut SqliteConnection) -> Result<Store, sqlx::Error> {
    let now = Utc::now();
    let store: Store = sqlx::query_as(
        r#"
            INSERT INTO stores (id, name, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *;
        "#,
    )
    .bind(store.id)
    .bind(store.name)
    .bind(store.user_id)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Store {} inserted for user {}", store.id, store.user_id);
    Ok(store)
}

pub async fn fetch_store(store_id: &StoreId, conn: &mut SqliteConnection) -> Result<Option<Store>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM stores WHERE id = $1").bind(store_id.as_str()).fetch_optional(conn).await
}

/// Returns the store only if `user_id` owns it.
pub async fn fetch_store_for_owner(
    store_id: &StoreId,
    user_id: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Option<Store>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM stores WHERE id = $1 AND user_id = $2")
        .bind(store_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(conn)
        .await
}
