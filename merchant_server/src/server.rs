use std::time::Duration;

use actix_web::{
    dev::Server,
    error::JsonPayloadError,
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
};
use log::*;
use merchant_engine::{ProductApi, SqliteDatabase, StoreAuthApi, VariantApi};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    middleware::IdentityMiddlewareFactory,
    routes::{
        health,
        CreateProductRoute,
        CreateVariantRoute,
        DashboardProductsRoute,
        DeleteProductRoute,
        DeleteVariantRoute,
        GetProductRoute,
        GetVariantRoute,
        ListProductsRoute,
        ListVariantsRoute,
        UpdateProductRoute,
        UpdateVariantRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.auto_migrate {
        info!("🚀️ Running database migrations on {}", db.url());
        db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let auth_api = StoreAuthApi::new(db.clone());
        let product_api = ProductApi::new(db.clone());
        let variant_api = VariantApi::new(db.clone());
        let api_scope = web::scope("/api")
            .wrap(IdentityMiddlewareFactory::new(&config.identity))
            .service(DashboardProductsRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(CreateProductRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(ListProductsRoute::<SqliteDatabase>::new())
            .service(GetProductRoute::<SqliteDatabase>::new())
            .service(UpdateProductRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(DeleteProductRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(CreateVariantRoute::<SqliteDatabase, SqliteDatabase>::new())
            .service(ListVariantsRoute::<SqliteDatabase>::new())
            .service(GetVariantRoute::<SqliteDatabase>::new())
            .service(UpdateVariantRoute::<SqliteDatabase>::new())
            .service(DeleteVariantRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("mcs::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(product_api))
            .app_data(web::Data::new(variant_api))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed JSON bodies are reported with the same `{"error": ...}` body as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Could not deserialize request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
