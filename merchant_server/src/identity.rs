use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use merchant_engine::db_types::UserId;

use crate::errors::ServerError;

/// The verified identity of the signed-in user.
///
/// [`crate::middleware::IdentityMiddlewareFactory`] places it in the request extensions once the identity headers
/// check out. Handlers that accept anonymous callers should take an `Option<Identity>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(UserId);

impl Identity {
    pub fn new(user_id: UserId) -> Self {
        Self(user_id)
    }

    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

impl FromRequest for Identity {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<Identity>().cloned().ok_or(ServerError::Unauthenticated))
    }
}
