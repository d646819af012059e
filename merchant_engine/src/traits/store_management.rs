use thiserror::Error;

use crate::db_types::{Store, StoreId, UserId};

#[derive(Debug, Clone, Error)]
pub enum StoreAuthError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Unauthenticated")]
    Unauthenticated,
    /// The store is owned by somebody else. Also returned when the store does not exist.
    #[error("Unauthorized")]
    Unauthorized { store_id: StoreId, user_id: UserId },
}

impl From<sqlx::Error> for StoreAuthError {
    fn from(e: sqlx::Error) -> Self {
        StoreAuthError::DatabaseError(e.to_string())
    }
}

/// Read-only access to stores and their owners.
#[allow(async_fn_in_trait)]
pub trait StoreManagement {
    /// Fetches the store with the given id, regardless of who owns it.
    async fn fetch_store(&self, store_id: &StoreId) -> Result<Option<Store>, StoreAuthError>;

    /// Fetches the store with the given id only if it is owned by `user_id`.
    async fn fetch_store_for_owner(&self, store_id: &StoreId, user_id: &UserId)
        -> Result<Option<Store>, StoreAuthError>;
}
