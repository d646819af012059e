//! Categories, colors and sizes. The product workflow only reads these; the inserts exist for provisioning.
use chrono::Utc;
use sqlx::SqliteConnection;

use crate::db_types::{Category, CategoryId, Color, NewCategory, NewColor, NewSize, Size};

pub async fn insert_category(category: NewCategory, conn: &mut SqliteConnection) -> Result<Category, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO categories (id, store_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *;
        "#,
    )
    .bind(category.id)
    .bind(category.store_id)
    .bind(category.name)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
}

pub async fn fetch_category(id: &CategoryId, conn: &mut SqliteConnection) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await
}

pub async fn insert_color(color: NewColor, conn: &mut SqliteConnection) -> Result<Color, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO colors (id, store_id, name, value, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *;
        "#,
    )
    .bind(color.id)
    .bind(color.store_id)
    .bind(color.name)
    .bind(color.value)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
}

pub async fn insert_size(size: NewSize, conn: &mut SqliteConnection) -> Result<Size, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO sizes (id, store_id, name, value, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *;
        "#,
    )
    .bind(size.id)
    .bind(size.store_id)
    .bind(size.name)
    .bind(size.value)
    .bind(Utc::now())
    .fetch_one(conn)
    .await
}
