use std::str::FromStr;

use cucumber::{then, when};
use log::*;
use merchant_engine::{
    db_types::{
        CategoryId,
        ColorId,
        NewImage,
        NewProduct,
        NewVariant,
        Price,
        ProductUpdate,
        SizeId,
        StoreId,
        UserId,
        VariantUpdate,
    },
    product_objects::ProductQueryFilter,
};

use crate::cucumber::CatalogWorld;

const COLORS: [&str; 2] = ["red", "blue"];
const SIZES: [&str; 2] = ["m", "l"];

fn images(product: &str, count: usize) -> Vec<NewImage> {
    (0..count).map(|i| NewImage::new(format!("https://img.example.com/{product}/{i}.png"))).collect()
}

fn variants(count: usize) -> Vec<NewVariant> {
    (0..count)
        .map(|i| NewVariant::new(ColorId::from(COLORS[i % 2]), SizeId::from(SIZES[(i / 2) % 2]), i as i64 + 1))
        .collect()
}

async fn authorize(world: &mut CatalogWorld, store: &str, user: &str) -> bool {
    let user = UserId::from(user);
    match world.system().auth.authorize(&StoreId::from(store), Some(&user)).await {
        Ok(_) => true,
        Err(e) => {
            debug!("🚀️ {user} may not modify store {store}. {e}");
            world.last_error = Some(e.to_string());
            false
        },
    }
}

async fn create_product(world: &mut CatalogWorld, user: &str, product: NewProduct) {
    world.last_error = None;
    if !authorize(world, product.store_id.as_str(), user).await {
        return;
    }
    let name = product.name.clone();
    match world.system().products.create_product(product).await {
        Ok(detail) => {
            world.products.insert(name, detail.product.id);
        },
        Err(e) => world.last_error = Some(e.to_string()),
    }
}

#[when(expr = "'{word}' creates product '{word}' in store '{word}' priced {word} with {int} images and {int} variants")]
async fn create_product_with_counts(
    world: &mut CatalogWorld,
    user: String,
    name: String,
    store: String,
    price: String,
    image_count: usize,
    variant_count: usize,
) {
    let price = Price::from_str(&price).expect("Invalid price");
    let mut product = NewProduct::new(StoreId::from(store), CategoryId::from("shirts"), name.as_str(), price);
    product.images = images(&name, image_count);
    product.variants = variants(variant_count);
    create_product(world, &user, product).await;
}

#[when(expr = "'{word}' creates product '{word}' in store '{word}' in category '{word}' flagged {word}")]
async fn create_flagged_product(
    world: &mut CatalogWorld,
    user: String,
    name: String,
    store: String,
    category: String,
    flags: String,
) {
    let product = NewProduct::new(StoreId::from(store), CategoryId::from(category), name.as_str(), Price::from_dollars(10))
        .with_image(NewImage::new(format!("https://img.example.com/{name}.png")))
        .featured(flags.contains("featured"))
        .archived(flags.contains("archived"));
    create_product(world, &user, product).await;
}

#[when(expr = "'{word}' updates product '{word}' in store '{word}' with {int} images and {int} new variants")]
async fn update_product(
    world: &mut CatalogWorld,
    user: String,
    name: String,
    store: String,
    image_count: usize,
    variant_count: usize,
) {
    world.last_error = None;
    if !authorize(world, &store, &user).await {
        return;
    }
    let store = StoreId::from(store);
    let id = world.product_id(&name);
    let current = world.system().products.product(&store, &id).await.expect("Error fetching product");
    let update = ProductUpdate {
        category_id: current.product.category_id,
        name: current.product.name,
        description: None,
        price: current.product.price,
        is_featured: current.product.is_featured,
        is_archived: current.product.is_archived,
        images: images(&format!("{name}-v2"), image_count),
        variants: variants(variant_count),
    };
    if let Err(e) = world.system().products.update_product(&store, &id, update).await {
        world.last_error = Some(e.to_string());
    }
}

#[when(expr = "'{word}' deletes product '{word}' from store '{word}'")]
async fn delete_product(world: &mut CatalogWorld, user: String, name: String, store: String) {
    world.last_error = None;
    if !authorize(world, &store, &user).await {
        return;
    }
    let id = world.product_id(&name);
    if let Err(e) = world.system().products.delete_product(&StoreId::from(store), &id).await {
        world.last_error = Some(e.to_string());
    }
}

#[when(expr = "'{word}' adds a {word} {word} variant with quantity {int} to product '{word}' in store '{word}'")]
async fn add_variant(
    world: &mut CatalogWorld,
    user: String,
    color: String,
    size: String,
    quantity: i64,
    name: String,
    store: String,
) {
    world.last_error = None;
    if !authorize(world, &store, &user).await {
        return;
    }
    let id = world.product_id(&name);
    let variant = NewVariant::new(ColorId::from(color), SizeId::from(size), quantity);
    if let Err(e) = world.system().variants.create_variant(&StoreId::from(store), &id, variant).await {
        world.last_error = Some(e.to_string());
    }
}

#[when(expr = "the quantity of every variant of product '{word}' in store '{word}' is set to {int}")]
async fn set_variant_quantities(world: &mut CatalogWorld, name: String, store: String, quantity: i64) {
    world.last_error = None;
    let store = StoreId::from(store);
    let id = world.product_id(&name);
    let api = &world.system().variants;
    let variants = api.variants_for_product(&store, &id).await.expect("Error fetching variants");
    let mut error = None;
    for v in variants {
        let update = VariantUpdate::default().with_quantity(quantity);
        if let Err(e) = api.update_variant(&store, &id, &v.variant.id, update).await {
            error = Some(e.to_string());
            break;
        }
    }
    world.last_error = error;
}

#[then("the request succeeds")]
async fn request_succeeds(world: &mut CatalogWorld) {
    assert!(world.last_error.is_none(), "Request failed: {:?}", world.last_error);
}

#[then(expr = "the request fails with {string}")]
async fn request_fails(world: &mut CatalogWorld, message: String) {
    let err = world.last_error.as_deref().expect("The request was expected to fail");
    assert_eq!(err, message);
}

#[then(expr = "the request fails with an error starting with {string}")]
async fn request_fails_with_prefix(world: &mut CatalogWorld, prefix: String) {
    let err = world.last_error.as_deref().expect("The request was expected to fail");
    assert!(err.starts_with(&prefix), "Unexpected error: {err}");
}

async fn count_rows(world: &CatalogWorld, table: &str, name: &str) -> i64 {
    let id = world.product_id(name);
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE product_id = $1");
    sqlx::query_scalar(&sql).bind(id.as_str()).fetch_one(world.system().db.pool()).await.expect("Error counting rows")
}

#[then(expr = "product '{word}' has {int} images")]
async fn image_count(world: &mut CatalogWorld, name: String, count: i64) {
    assert_eq!(count_rows(world, "images", &name).await, count, "Wrong number of images for {name}");
}

#[then(expr = "product '{word}' has {int} variants")]
async fn variant_count(world: &mut CatalogWorld, name: String, count: i64) {
    assert_eq!(count_rows(world, "product_variants", &name).await, count, "Wrong number of variants for {name}");
}

#[then(expr = "every variant of product '{word}' in store '{word}' has quantity {int}")]
async fn variant_quantities(world: &mut CatalogWorld, name: String, store: String, quantity: i64) {
    let id = world.product_id(&name);
    let variants =
        world.system().variants.variants_for_product(&StoreId::from(store), &id).await.expect("Error fetching variants");
    assert!(variants.iter().all(|v| v.variant.quantity == quantity));
}

#[then(expr = "product '{word}' no longer exists in store '{word}'")]
async fn product_gone(world: &mut CatalogWorld, name: String, store: String) {
    let id = world.product_id(&name);
    let result = world.system().products.product(&StoreId::from(store), &id).await;
    assert!(result.is_err(), "Product {name} still exists");
}

#[then(expr = "store '{word}' has {int} products on the dashboard")]
async fn dashboard_count(world: &mut CatalogWorld, store: String, count: usize) {
    let products =
        world.system().products.dashboard_products(&StoreId::from(store)).await.expect("Error fetching dashboard");
    assert_eq!(products.len(), count);
}

#[then(expr = "the public listing for store '{word}' is {string}")]
async fn public_listing(world: &mut CatalogWorld, store: String, expected: String) {
    let filter = ProductQueryFilter::for_store(StoreId::from(store));
    listing_matches(world, filter, &expected).await;
}

#[then(expr = "the featured listing for store '{word}' is {string}")]
async fn featured_listing(world: &mut CatalogWorld, store: String, expected: String) {
    let filter = ProductQueryFilter::for_store(StoreId::from(store)).featured_only();
    listing_matches(world, filter, &expected).await;
}

#[then(expr = "the listing for category '{word}' in store '{word}' is {string}")]
async fn category_listing(world: &mut CatalogWorld, category: String, store: String, expected: String) {
    let filter = ProductQueryFilter::for_store(StoreId::from(store)).with_category_id(CategoryId::from(category));
    listing_matches(world, filter, &expected).await;
}

/// `expected` is a comma-separated list of product names, newest first.
async fn listing_matches(world: &CatalogWorld, filter: ProductQueryFilter, expected: &str) {
    let products = world.system().products.list_products(filter).await.expect("Error listing products");
    let names = products.iter().map(|p| p.product.name.as_str()).collect::<Vec<_>>().join(",");
    assert_eq!(names, expected);
}
