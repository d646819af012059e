use chrono::Utc;
use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::{catalog, images, variants};
use crate::{
    db_types::{NewProduct, Product, ProductDetail, ProductId, ProductUpdate},
    merchant_api::product_objects::ProductQueryFilter,
};

/// Inserts the product row only. Images and variants are inserted separately by the caller.
pub async fn insert_product(product: &NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    let now = Utc::now();
    let product: Product = sqlx::query_as(
        r#"
            INSERT INTO products (
                id,
                store_id,
                category_id,
                name,
                description,
                price,
                is_featured,
                is_archived,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *;
        "#,
    )
    .bind(ProductId::new_random())
    .bind(product.store_id.as_str())
    .bind(product.category_id.as_str())
    .bind(product.name.as_str())
    .bind(product.description.as_str())
    .bind(product.price)
    .bind(product.is_featured)
    .bind(product.is_archived)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Product {} inserted into store {}", product.id, product.store_id);
    Ok(product)
}

pub async fn fetch_product(product_id: &ProductId, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id.as_str()).fetch_optional(conn).await
}

/// Overwrites the scalar fields of a product. The description is kept if the update does not carry one.
pub async fn update_product_fields(
    product_id: &ProductId,
    update: &ProductUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE products SET
                category_id = $1,
                name = $2,
                description = COALESCE($3, description),
                price = $4,
                is_featured = $5,
                is_archived = $6,
                updated_at = $7
            WHERE id = $8
            RETURNING *;
        "#,
    )
    .bind(update.category_id.as_str())
    .bind(update.name.as_str())
    .bind(update.description.as_deref())
    .bind(update.price)
    .bind(update.is_featured)
    .bind(update.is_archived)
    .bind(Utc::now())
    .bind(product_id.as_str())
    .fetch_optional(conn)
    .await
}

/// Deletes the product row. This fails with a foreign key violation while any images or variants still refer to it.
pub async fn delete_product(product_id: &ProductId, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("DELETE FROM products WHERE id = $1 RETURNING *").bind(product_id.as_str()).fetch_optional(conn).await
}

/// Fetches products according to the criteria in the `ProductQueryFilter`.
///
/// Results are ordered by `created_at`, newest first.
pub async fn search_products(
    query: ProductQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM products ");
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(store_id) = query.store_id {
        where_clause.push("store_id = ");
        where_clause.push_bind_unseparated(store_id);
    }
    if let Some(category_id) = query.category_id {
        where_clause.push("category_id = ");
        where_clause.push_bind_unseparated(category_id);
    }
    if let Some(featured) = query.is_featured {
        where_clause.push("is_featured = ");
        where_clause.push_bind_unseparated(featured);
    }
    if let Some(archived) = query.is_archived {
        where_clause.push("is_archived = ");
        where_clause.push_bind_unseparated(archived);
    }
    builder.push(" ORDER BY created_at DESC, rowid DESC");
    trace!("📝️ Executing query: {}", builder.sql());
    builder.build_query_as::<Product>().fetch_all(conn).await
}

/// Joins the product with its category, images and variants.
pub async fn fetch_product_detail(product: Product, conn: &mut SqliteConnection) -> Result<ProductDetail, sqlx::Error> {
    let category = catalog::fetch_category(&product.category_id, &mut *conn).await?.ok_or(sqlx::Error::RowNotFound)?;
    let images = images::fetch_images_for_product(&product.id, &mut *conn).await?;
    let variants = variants::fetch_variant_details_for_product(&product.id, &mut *conn).await?;
    Ok(ProductDetail { product, category, images, variants })
}
