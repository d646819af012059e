//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! All catalog routes live under `/api/{storeId}`. Reads are public. Writes need an [`Identity`], and all but the
//! single-variant writes also need the identity to own the store.
//!
//! Mutating handlers take the [`Identity`] as their first argument, so anonymous requests are refused with a 403 before
//! the body is even parsed. After that, checks run in a fixed order:
//! 1. a body that is not valid JSON for the form (400),
//! 2. store ownership (405),
//! 3. field validation (400),
//! 4. existence of the target record (404).
//!
//! Nothing is written until all of these pass.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use merchant_engine::{
    product_objects::{ProductForm, VariantForm},
    traits::{ProductManagement, StoreManagement, VariantManagement},
    ProductApi,
    StoreAuthApi,
    VariantApi,
};

use crate::{
    data_objects::{ProductListQuery, ProductPath, StorePath, VariantPath},
    errors::ServerError,
    identity::Identity,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(create_product => Post "/{storeId}/products" impl StoreManagement, ProductManagement);
/// Creates a product, along with all of its images and variants, in the store given in the path.
pub async fn create_product<A: StoreManagement, P: ProductManagement>(
    identity: Identity,
    path: web::Path<StorePath>,
    body: web::Json<ProductForm>,
    auth: web::Data<StoreAuthApi<A>>,
    api: web::Data<ProductApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let StorePath { store_id } = path.into_inner();
    debug!("💻️ POST product for store {store_id} by {}", identity.user_id());
    auth.authorize(&store_id, Some(identity.user_id())).await?;
    let product = body.into_inner().into_new_product(store_id)?;
    let detail = api.create_product(product).await?;
    Ok(HttpResponse::Ok().json(detail))
}

route!(list_products => Get "/{storeId}/products" impl ProductManagement);
/// The public product listing. Supports the `categoryId` and `isFeatured` query parameters. Archived products are never
/// listed.
///
/// `isFeatured` is read as a boolean flag: `true` (or `1`, `yes`, `on`) lists featured products only. Any other value,
/// `isFeatured=false` included, applies no featured filter at all. It never restricts the list to non-featured
/// products.
pub async fn list_products<P: ProductManagement>(
    path: web::Path<StorePath>,
    query: web::Query<ProductListQuery>,
    api: web::Data<ProductApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let StorePath { store_id } = path.into_inner();
    let filter = query.into_inner().into_filter(store_id);
    debug!("💻️ GET products [{filter}]");
    let products = api.list_products(filter).await?;
    Ok(HttpResponse::Ok().json(products))
}

route!(get_product => Get "/{storeId}/products/{productId}" impl ProductManagement);
pub async fn get_product<P: ProductManagement>(
    path: web::Path<ProductPath>,
    api: web::Data<ProductApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let ProductPath { store_id, product_id } = path.into_inner();
    debug!("💻️ GET product {product_id} in store {store_id}");
    let detail = api.product(&store_id, &product_id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

route!(update_product => Patch "/{storeId}/products/{productId}" impl StoreManagement, ProductManagement);
/// Updates a product. The image list in the body replaces the product's images. The variants in the body are added to
/// the product's existing variants.
pub async fn update_product<A: StoreManagement, P: ProductManagement>(
    identity: Identity,
    path: web::Path<ProductPath>,
    body: web::Json<ProductForm>,
    auth: web::Data<StoreAuthApi<A>>,
    api: web::Data<ProductApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let ProductPath { store_id, product_id } = path.into_inner();
    debug!("💻️ PATCH product {product_id} in store {store_id} by {}", identity.user_id());
    auth.authorize(&store_id, Some(identity.user_id())).await?;
    let update = body.into_inner().into_product_update()?;
    let detail = api.update_product(&store_id, &product_id, update).await?;
    Ok(HttpResponse::Ok().json(detail))
}

route!(delete_product => Delete "/{storeId}/products/{productId}" impl StoreManagement, ProductManagement);
/// Deletes every variant of the product, then the product itself. Returns the product as it was before deletion.
pub async fn delete_product<A: StoreManagement, P: ProductManagement>(
    identity: Identity,
    path: web::Path<ProductPath>,
    auth: web::Data<StoreAuthApi<A>>,
    api: web::Data<ProductApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let ProductPath { store_id, product_id } = path.into_inner();
    debug!("💻️ DELETE product {product_id} in store {store_id}");
    auth.authorize(&store_id, Some(identity.user_id())).await?;
    let deleted = api.delete_product(&store_id, &product_id).await?;
    Ok(HttpResponse::Ok().json(deleted))
}

route!(dashboard_products => Get "/{storeId}/dashboard/products" impl StoreManagement, ProductManagement);
/// The store owner's product table, with archived products included and prices and dates formatted for display.
pub async fn dashboard_products<A: StoreManagement, P: ProductManagement>(
    identity: Identity,
    path: web::Path<StorePath>,
    auth: web::Data<StoreAuthApi<A>>,
    api: web::Data<ProductApi<P>>,
) -> Result<HttpResponse, ServerError> {
    let StorePath { store_id } = path.into_inner();
    debug!("💻️ GET dashboard products for store {store_id}");
    auth.authorize(&store_id, Some(identity.user_id())).await?;
    let columns = api.dashboard_products(&store_id).await?;
    Ok(HttpResponse::Ok().json(columns))
}

//----------------------------------------------   Variants  ----------------------------------------------------
route!(create_variant => Post "/{storeId}/products/{productId}/productVariants" impl StoreManagement, VariantManagement);
pub async fn create_variant<A: StoreManagement, V: VariantManagement>(
    identity: Identity,
    path: web::Path<ProductPath>,
    body: web::Json<VariantForm>,
    auth: web::Data<StoreAuthApi<A>>,
    api: web::Data<VariantApi<V>>,
) -> Result<HttpResponse, ServerError> {
    let ProductPath { store_id, product_id } = path.into_inner();
    debug!("💻️ POST variant for product {product_id} in store {store_id}");
    auth.authorize(&store_id, Some(identity.user_id())).await?;
    let variant = body.into_inner().into_new_variant()?;
    let variant = api.create_variant(&store_id, &product_id, variant).await?;
    Ok(HttpResponse::Ok().json(variant))
}

route!(list_variants => Get "/{storeId}/products/{productId}/productVariants" impl VariantManagement);
pub async fn list_variants<V: VariantManagement>(
    path: web::Path<ProductPath>,
    api: web::Data<VariantApi<V>>,
) -> Result<HttpResponse, ServerError> {
    let ProductPath { store_id, product_id } = path.into_inner();
    debug!("💻️ GET variants for product {product_id} in store {store_id}");
    let variants = api.variants_for_product(&store_id, &product_id).await?;
    Ok(HttpResponse::Ok().json(variants))
}

route!(get_variant => Get "/{storeId}/products/{productId}/productVariants/{variantId}" impl VariantManagement);
pub async fn get_variant<V: VariantManagement>(
    path: web::Path<VariantPath>,
    api: web::Data<VariantApi<V>>,
) -> Result<HttpResponse, ServerError> {
    let VariantPath { store_id, product_id, variant_id } = path.into_inner();
    debug!("💻️ GET variant {variant_id} of product {product_id}");
    let variant = api.variant(&store_id, &product_id, &variant_id).await?;
    Ok(HttpResponse::Ok().json(variant))
}

route!(update_variant => Patch "/{storeId}/products/{productId}/productVariants/{variantId}" impl VariantManagement);
/// Patches any of `colorId`, `sizeId` and `quantity`. Any signed-in user may do this; store ownership is only checked
/// when variants are created.
pub async fn update_variant<V: VariantManagement>(
    identity: Identity,
    path: web::Path<VariantPath>,
    body: web::Json<VariantForm>,
    api: web::Data<VariantApi<V>>,
) -> Result<HttpResponse, ServerError> {
    let VariantPath { store_id, product_id, variant_id } = path.into_inner();
    debug!("💻️ PATCH variant {variant_id} of product {product_id} by {}", identity.user_id());
    let update = body.into_inner().into_variant_update()?;
    let variant = api.update_variant(&store_id, &product_id, &variant_id, update).await?;
    Ok(HttpResponse::Ok().json(variant))
}

route!(delete_variant => Delete "/{storeId}/products/{productId}/productVariants/{variantId}" impl VariantManagement);
pub async fn delete_variant<V: VariantManagement>(
    identity: Identity,
    path: web::Path<VariantPath>,
    api: web::Data<VariantApi<V>>,
) -> Result<HttpResponse, ServerError> {
    let VariantPath { store_id, product_id, variant_id } = path.into_inner();
    debug!("💻️ DELETE variant {variant_id} of product {product_id} by {}", identity.user_id());
    let variant = api.delete_variant(&store_id, &product_id, &variant_id).await?;
    Ok(HttpResponse::Ok().json(variant))
}
