use chrono::Utc;
use log::trace;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::db_types::{Image, ImageId, NewImage, ProductId};

/// Inserts all the images for a product in one statement.
pub async fn insert_images(
    product_id: &ProductId,
    images: &[NewImage],
    conn: &mut SqliteConnection,
) -> Result<Vec<Image>, sqlx::Error> {
    if images.is_empty() {
        return Ok(Vec::new());
    }
    let now = Utc::now();
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO images (id, product_id, url, created_at, updated_at) ");
    builder.push_values(images, |mut row, image| {
        row.push_bind(ImageId::new_random())
            .push_bind(product_id.clone())
            .push_bind(image.url.clone())
            .push_bind(now)
            .push_bind(now);
    });
    builder.push(" RETURNING *");
    trace!("📝️ Executing query: {}", builder.sql());
    builder.build_query_as::<Image>().fetch_all(conn).await
}

/// Images in the order they were added.
pub async fn fetch_images_for_product(
    product_id: &ProductId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Image>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM images WHERE product_id = $1 ORDER BY created_at ASC, rowid ASC")
        .bind(product_id.as_str())
        .fetch_all(conn)
        .await
}

/// Deletes every image of the product, returning the number of rows removed.
pub async fn delete_images_for_product(
    product_id: &ProductId,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM images WHERE product_id = $1").bind(product_id.as_str()).execute(conn).await?;
    Ok(result.rows_affected())
}
