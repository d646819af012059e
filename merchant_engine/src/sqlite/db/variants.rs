use chrono::Utc;
use log::{debug, trace};
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, Row, Sqlite, SqliteConnection};

use crate::db_types::{Color, NewVariant, ProductId, ProductVariant, Size, VariantDetail, VariantId, VariantUpdate};

const VARIANT_DETAIL_QUERY: &str = r#"
    SELECT
        v.*,
        c.store_id   AS color_store_id,
        c.name       AS color_name,
        c.value      AS color_value,
        c.created_at AS color_created_at,
        c.updated_at AS color_updated_at,
        s.store_id   AS size_store_id,
        s.name       AS size_name,
        s.value      AS size_value,
        s.created_at AS size_created_at,
        s.updated_at AS size_updated_at
    FROM product_variants v
    JOIN colors c ON c.id = v.color_id
    JOIN sizes s ON s.id = v.size_id
"#;

impl<'r> FromRow<'r, SqliteRow> for VariantDetail {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let variant = ProductVariant::from_row(row)?;
        let color = Color {
            id: variant.color_id.clone(),
            store_id: row.try_get("color_store_id")?,
            name: row.try_get("color_name")?,
            value: row.try_get("color_value")?,
            created_at: row.try_get("color_created_at")?,
            updated_at: row.try_get("color_updated_at")?,
        };
        let size = Size {
            id: variant.size_id.clone(),
            store_id: row.try_get("size_store_id")?,
            name: row.try_get("size_name")?,
            value: row.try_get("size_value")?,
            created_at: row.try_get("size_created_at")?,
            updated_at: row.try_get("size_updated_at")?,
        };
        Ok(Self { variant, color, size })
    }
}

pub async fn insert_variant(
    product_id: &ProductId,
    variant: &NewVariant,
    conn: &mut SqliteConnection,
) -> Result<ProductVariant, sqlx::Error> {
    let now = Utc::now();
    let variant: ProductVariant = sqlx::query_as(
        r#"
            INSERT INTO product_variants (id, product_id, color_id, size_id, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *;
        "#,
    )
    .bind(VariantId::new_random())
    .bind(product_id.as_str())
    .bind(variant.color_id.as_str())
    .bind(variant.size_id.as_str())
    .bind(variant.quantity)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Variant {} inserted for product {product_id}", variant.id);
    Ok(variant)
}

pub async fn fetch_variant_detail(
    variant_id: &VariantId,
    conn: &mut SqliteConnection,
) -> Result<Option<VariantDetail>, sqlx::Error> {
    let sql = format!("{VARIANT_DETAIL_QUERY} WHERE v.id = $1");
    sqlx::query_as(&sql).bind(variant_id.as_str()).fetch_optional(conn).await
}

/// Variants of the product with their color and size, newest first.
pub async fn fetch_variant_details_for_product(
    product_id: &ProductId,
    conn: &mut SqliteConnection,
) -> Result<Vec<VariantDetail>, sqlx::Error> {
    let sql = format!("{VARIANT_DETAIL_QUERY} WHERE v.product_id = $1 ORDER BY v.created_at DESC, v.rowid DESC");
    sqlx::query_as(&sql).bind(product_id.as_str()).fetch_all(conn).await
}

/// Applies the fields present in the update. An empty update only touches `updated_at`.
pub async fn update_variant(
    variant_id: &VariantId,
    update: VariantUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<ProductVariant>, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE product_variants SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(color_id) = update.color_id {
        set_clause.push("color_id = ");
        set_clause.push_bind_unseparated(color_id);
    }
    if let Some(size_id) = update.size_id {
        set_clause.push("size_id = ");
        set_clause.push_bind_unseparated(size_id);
    }
    if let Some(quantity) = update.quantity {
        set_clause.push("quantity = ");
        set_clause.push_bind_unseparated(quantity);
    }
    set_clause.push("updated_at = ");
    set_clause.push_bind_unseparated(Utc::now());
    builder.push(" WHERE id = ");
    builder.push_bind(variant_id.clone());
    builder.push(" RETURNING *");
    trace!("📝️ Executing query: {}", builder.sql());
    builder.build_query_as::<ProductVariant>().fetch_optional(conn).await
}

/// Deletes a single variant, returning it if it existed.
pub async fn delete_variant(
    variant_id: &VariantId,
    conn: &mut SqliteConnection,
) -> Result<Option<ProductVariant>, sqlx::Error> {
    let deleted: Option<ProductVariant> = sqlx::query_as("DELETE FROM product_variants WHERE id = $1 RETURNING *")
        .bind(variant_id.as_str())
        .fetch_optional(conn)
        .await?;
    if let Some(v) = &deleted {
        debug!("📝️ Variant {} deleted from product {}", v.id, v.product_id);
    }
    Ok(deleted)
}
