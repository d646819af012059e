//! Identity middleware for Actix Web.
//!
//! The authentication provider in front of the server forwards the signed-in user id in a header and signs it with a
//! shared secret. The signature is the base64-encoded HMAC-SHA256 of the user id.
//!
//! This middleware never rejects a request. If the identity headers are present and the signature is valid, an
//! [`Identity`] is inserted into the request extensions. Otherwise the request continues anonymously, and the handler
//! decides whether that is acceptable.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{debug, trace, warn};
use merchant_common::{helpers::non_blank, Secret};
use merchant_engine::db_types::UserId;

use crate::{config::IdentityConfig, helpers::verify_hmac, identity::Identity};

pub struct IdentityMiddlewareFactory {
    user_header: String,
    signature_header: String,
    secret: Secret<String>,
    // If false, the user id header is trusted without a signature
    checks: bool,
}

impl IdentityMiddlewareFactory {
    pub fn new(config: &IdentityConfig) -> Self {
        IdentityMiddlewareFactory {
            user_header: config.user_header.clone(),
            signature_header: config.signature_header.clone(),
            secret: config.secret.clone(),
            checks: config.checks,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = IdentityMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            user_header: self.user_header.clone(),
            signature_header: self.signature_header.clone(),
            secret: self.secret.clone(),
            checks: self.checks,
            service: Rc::new(service),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    user_header: String,
    signature_header: String,
    secret: Secret<String>,
    checks: bool,
    service: Rc<S>,
}

impl<S> IdentityMiddlewareService<S> {
    fn identify(&self, req: &ServiceRequest) -> Option<Identity> {
        let header = |name: &str| req.headers().get(name).and_then(|v| v.to_str().ok());
        let user_id = non_blank(header(&self.user_header))?;
        if !self.checks {
            trace!("🔐️ Identity checks are disabled. Trusting user id {user_id}");
            return Some(Identity::new(UserId::from(user_id)));
        }
        let Some(signature) = header(&self.signature_header) else {
            debug!("🔐️ User id {user_id} supplied without a signature. Treating request as anonymous.");
            return None;
        };
        if verify_hmac(self.secret.reveal(), user_id.as_bytes(), signature) {
            trace!("🔐️ Identity check for {user_id} ✅️");
            Some(Identity::new(UserId::from(user_id)))
        } else {
            warn!("🔐️ Invalid identity signature for user id {user_id}. Treating request as anonymous.");
            None
        }
    }
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(identity) = self.identify(&req) {
            req.extensions_mut().insert(identity);
        }
        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}
