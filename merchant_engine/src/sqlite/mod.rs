//! SQLite backend for the merchant console.
//!
//! The schema lives in `migrations/` and is embedded into the binary; see [`SqliteDatabase::run_migrations`].
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
