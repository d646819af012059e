//! # Merchant console server
//! This crate hosts the HTTP API of the merchant console. It is responsible for:
//! * Identifying the signed-in user from the headers set by the authentication provider.
//! * Checking that the user owns the store they are modifying.
//! * Validating request bodies and handing them to the catalog engine.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/{storeId}/products[/{productId}]`: product creation, listing, reads, updates and deletion.
//! * `/api/{storeId}/products/{productId}/productVariants[/{variantId}]`: variant management.
//! * `/api/{storeId}/dashboard/products`: the store owner's product table.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod identity;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
