use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use merchant_engine::{
    db_types::{DeletionStage, ProductId},
    traits::ProductApiError,
    ProductApi,
    StoreAuthApi,
};
use serde_json::json;

use super::{
    helpers::{identity_config, product, product_detail, product_form, send_request, signed, store},
    mocks::{MockProductManager, MockStoreManager},
};
use crate::routes::{
    CreateProductRoute,
    DashboardProductsRoute,
    DeleteProductRoute,
    GetProductRoute,
    ListProductsRoute,
    UpdateProductRoute,
};

fn configure(stores: MockStoreManager, products: MockProductManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(StoreAuthApi::new(stores)))
            .app_data(web::Data::new(ProductApi::new(products)))
            .service(DashboardProductsRoute::<MockStoreManager, MockProductManager>::new())
            .service(CreateProductRoute::<MockStoreManager, MockProductManager>::new())
            .service(ListProductsRoute::<MockProductManager>::new())
            .service(GetProductRoute::<MockProductManager>::new())
            .service(UpdateProductRoute::<MockStoreManager, MockProductManager>::new())
            .service(DeleteProductRoute::<MockStoreManager, MockProductManager>::new());
    }
}

/// A store mock that must never be consulted
fn untouched_stores() -> MockStoreManager {
    let mut stores = MockStoreManager::new();
    stores.expect_fetch_store_for_owner().never();
    stores
}

/// A store mock where `acme` is owned by `alice` and nobody else owns anything
fn acme_stores() -> MockStoreManager {
    let mut stores = MockStoreManager::new();
    stores
        .expect_fetch_store_for_owner()
        .returning(|s, u| Ok((s.as_str() == "acme" && u.as_str() == "alice").then(|| store("acme", "alice"))));
    stores
}

/// A product mock that fails the test if anything is written
fn read_only_products() -> MockProductManager {
    let mut products = MockProductManager::new();
    products.expect_insert_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();
    products
}

#[actix_web::test]
async fn create_product_anonymously() {
    let req = TestRequest::post().uri("/api/acme/products").set_json(product_form());
    let (status, body) = send_request(req, identity_config(), configure(untouched_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Unauthenticated"}"#);
}

#[actix_web::test]
async fn create_product_with_forged_identity() {
    let req = TestRequest::post()
        .uri("/api/acme/products")
        .insert_header(("x-merchant-user-id", "alice"))
        .insert_header(("x-merchant-identity-signature", "bm90IGEgc2lnbmF0dXJl"))
        .set_json(product_form());
    let (status, _) = send_request(req, identity_config(), configure(untouched_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn create_product_in_someone_elses_store() {
    let req = signed(TestRequest::post().uri("/api/acme/products"), "bob").set_json(product_form());
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, r#"{"error":"Unauthorized"}"#);
}

#[actix_web::test]
async fn create_product_without_images() {
    let mut form = product_form();
    form["images"] = json!([]);
    let req = signed(TestRequest::post().uri("/api/acme/products"), "alice").set_json(form);
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Images are required"}"#);
}

#[actix_web::test]
async fn create_product_with_invalid_body_in_someone_elses_store() {
    let mut form = product_form();
    form["images"] = json!([]);
    form["name"] = json!("");
    let req = signed(TestRequest::post().uri("/api/acme/products"), "bob").set_json(form);
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, r#"{"error":"Unauthorized"}"#);
}

#[actix_web::test]
async fn anonymous_writes_with_unreadable_bodies() {
    let req = TestRequest::post()
        .uri("/api/acme/products")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json");
    let (status, body) = send_request(req, identity_config(), configure(untouched_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Unauthenticated"}"#);

    let req = TestRequest::patch().uri("/api/acme/products/p1").set_json(json!({ "price": "abc" }));
    let (status, body) = send_request(req, identity_config(), configure(untouched_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Unauthenticated"}"#);
}

#[actix_web::test]
async fn create_product_with_malformed_body() {
    let req = signed(TestRequest::post().uri("/api/acme/products"), "alice")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ this is not json");
    let (status, body) = send_request(req, identity_config(), configure(untouched_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request body"#), "was: {body}");
}

#[actix_web::test]
async fn create_product() {
    let mut products = MockProductManager::new();
    products
        .expect_insert_product()
        .withf(|p| p.store_id.as_str() == "acme" && p.images.len() == 1 && p.variants.len() == 1 && p.is_featured)
        .times(1)
        .returning(|_| Ok(product_detail("acme", "p1")));
    let req = signed(TestRequest::post().uri("/api/acme/products"), "alice").set_json(product_form());
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), products)).await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["id"], "p1");
    assert_eq!(body["price"], "19.99");
    assert_eq!(body["storeId"], "acme");
    assert_eq!(body["category"]["name"], "Shirts");
    assert_eq!(body["variants"][0]["color"]["value"], "#ff0000");
}

#[actix_web::test]
async fn update_product_with_empty_images() {
    let mut form = product_form();
    form["images"] = json!([]);
    let req = signed(TestRequest::patch().uri("/api/acme/products/p1"), "alice").set_json(form);
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Images are required"}"#);
}

#[actix_web::test]
async fn update_product_needs_color_and_size() {
    let mut form = product_form();
    form.as_object_mut().unwrap().remove("sizeId");
    let req = signed(TestRequest::patch().uri("/api/acme/products/p1"), "alice").set_json(form);
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Size id is required"}"#);
}

#[actix_web::test]
async fn update_missing_product() {
    let mut products = read_only_products();
    products.expect_fetch_product().returning(|_| Ok(None));
    let req = signed(TestRequest::patch().uri("/api/acme/products/p404"), "alice").set_json(product_form());
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), products)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Product not found"}"#);
}

#[actix_web::test]
async fn update_product() {
    let mut products = MockProductManager::new();
    products.expect_fetch_product().returning(|id| Ok(Some(product("acme", id.as_str()))));
    products
        .expect_update_product()
        .withf(|id, u| id.as_str() == "p1" && u.description.as_deref() == Some("Plain cotton tee"))
        .times(1)
        .returning(|id, _| Ok(product_detail("acme", id.as_str())));
    let req = signed(TestRequest::patch().uri("/api/acme/products/p1"), "alice").set_json(product_form());
    let (status, _) = send_request(req, identity_config(), configure(acme_stores(), products)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn get_product_from_another_store() {
    let mut products = read_only_products();
    products.expect_fetch_product_detail().returning(|id| Ok(Some(product_detail("globex", id.as_str()))));
    let req = TestRequest::get().uri("/api/acme/products/p1");
    let (status, body) = send_request(req, identity_config(), configure(untouched_stores(), products)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Product not found"}"#);
}

#[actix_web::test]
async fn get_product_is_public() {
    let mut products = read_only_products();
    products.expect_fetch_product_detail().returning(|id| Ok(Some(product_detail("acme", id.as_str()))));
    let req = TestRequest::get().uri("/api/acme/products/p1");
    let (status, body) = send_request(req, identity_config(), configure(untouched_stores(), products)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""images":[{"#), "was: {body}");
}

#[actix_web::test]
async fn list_featured_products() {
    let mut products = read_only_products();
    products
        .expect_search_products()
        .withf(|q| {
            q.store_id.as_ref().map(|s| s.as_str()) == Some("acme") &&
                q.is_featured == Some(true) &&
                q.is_archived == Some(false) &&
                q.category_id.as_ref().map(|c| c.as_str()) == Some("shirts")
        })
        .times(1)
        .returning(|_| Ok(vec![product_detail("acme", "p1")]));
    let req = TestRequest::get().uri("/api/acme/products?isFeatured=true&categoryId=shirts");
    let (status, body) = send_request(req, identity_config(), configure(untouched_stores(), products)).await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn list_products_without_filters_still_hides_archived() {
    let mut products = read_only_products();
    products
        .expect_search_products()
        .withf(|q| q.is_featured.is_none() && q.is_archived == Some(false) && q.category_id.is_none())
        .times(1)
        .returning(|_| Ok(vec![]));
    let req = TestRequest::get().uri("/api/acme/products?isFeatured=false");
    let (status, body) = send_request(req, identity_config(), configure(untouched_stores(), products)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn delete_product_anonymously() {
    let req = TestRequest::delete().uri("/api/acme/products/p1");
    let (status, _) = send_request(req, identity_config(), configure(untouched_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn delete_product_in_someone_elses_store() {
    let req = signed(TestRequest::delete().uri("/api/acme/products/p1"), "mallory");
    let (status, _) = send_request(req, identity_config(), configure(acme_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn failed_deletion_is_an_internal_error() {
    let mut products = MockProductManager::new();
    products.expect_fetch_product().returning(|id| Ok(Some(product("acme", id.as_str()))));
    products.expect_delete_product().times(1).returning(|_| {
        Err(ProductApiError::DeletionFailed {
            stage: DeletionStage::Requested,
            reason: "database is locked".to_string(),
        })
    });
    let req = signed(TestRequest::delete().uri("/api/acme/products/p1"), "alice");
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), products)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"error":"Internal error"}"#);
}

#[actix_web::test]
async fn delete_product() {
    let mut products = MockProductManager::new();
    products.expect_fetch_product().returning(|id| Ok(Some(product("acme", id.as_str()))));
    products
        .expect_delete_product()
        .withf(|id| id == &ProductId::from("p1"))
        .times(1)
        .returning(|id| Ok(product_detail("acme", id.as_str())));
    let req = signed(TestRequest::delete().uri("/api/acme/products/p1"), "alice");
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), products)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""id":"p1""#), "was: {body}");
}

#[actix_web::test]
async fn dashboard_is_for_owners_only() {
    let req = TestRequest::get().uri("/api/acme/dashboard/products");
    let (status, _) = send_request(req, identity_config(), configure(untouched_stores(), read_only_products())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut products = read_only_products();
    products
        .expect_search_products()
        .withf(|q| q.is_archived.is_none())
        .returning(|_| Ok(vec![product_detail("acme", "p1")]));
    let req = signed(TestRequest::get().uri("/api/acme/dashboard/products"), "alice");
    let (status, body) = send_request(req, identity_config(), configure(acme_stores(), products)).await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body[0]["price"], "$19.99");
    assert_eq!(body[0]["category"], "Shirts");
    assert_eq!(body[0]["variants"][0]["size"], "m");
}
