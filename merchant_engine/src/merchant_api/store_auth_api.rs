//! Ownership checks for stores.
use std::fmt::Debug;

use log::{debug, trace};

use crate::{
    db_types::{Store, StoreId, UserId},
    traits::{StoreAuthError, StoreManagement},
};

/// `StoreAuthApi` decides whether the acting user may mutate a store's catalog.
pub struct StoreAuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for StoreAuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StoreAuthApi ({:?})", self.db)
    }
}

impl<B> StoreAuthApi<B>
where B: StoreManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    /// Succeeds if there is a signed-in user.
    pub fn authenticate<'a>(&self, user_id: Option<&'a UserId>) -> Result<&'a UserId, StoreAuthError> {
        user_id.ok_or_else(|| {
            debug!("🔐️ Request has no user identity");
            StoreAuthError::Unauthenticated
        })
    }

    /// Succeeds if there is a signed-in user and they own the store. The identity is checked before the store is looked
    /// up, so anonymous requests never reach the backend.
    pub async fn authorize(&self, store_id: &StoreId, user_id: Option<&UserId>) -> Result<Store, StoreAuthError> {
        let user_id = self.authenticate(user_id)?;
        trace!("🔐️ Checking that {user_id} owns store {store_id}");
        self.db.fetch_store_for_owner(store_id, user_id).await?.ok_or_else(|| {
            debug!("🔐️ User {user_id} does not own store {store_id}");
            StoreAuthError::Unauthorized { store_id: store_id.clone(), user_id: user_id.clone() }
        })
    }

    pub async fn store(&self, store_id: &StoreId) -> Result<Option<Store>, StoreAuthError> {
        self.db.fetch_store(store_id).await
    }
}
