//! Caller identity.
//!
//! Sessions are owned by the identity integration in front of this service.
//! By the time a request reaches a handler, that integration has either
//! attached the caller's account id or it hasn't; this module only reads it.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName},
};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the caller's identity, or `None` when there is no valid session.
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Identity>;
}

/// Trusts a header that the identity proxy sets after validating the session.
pub struct TrustedHeaderAuthenticator {
    header: HeaderName,
}

impl TrustedHeaderAuthenticator {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

#[async_trait]
impl Authenticator for TrustedHeaderAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<Identity> {
        let id = headers.get(&self.header)?.to_str().ok()?.trim();
        if id.is_empty() {
            return None;
        }
        Some(Identity { id: id.to_string() })
    }
}

/// Extractor that rejects the request with 401 unless the caller is authenticated.
/// Place it before any body extractor so storage is never touched anonymously.
pub struct AuthUser(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match state.authenticator.authenticate(&parts.headers).await {
            Some(identity) => Ok(AuthUser(identity)),
            None => {
                warn!("{} {}: no authenticated identity", parts.method, parts.uri.path());
                Err(AppError::Unauthorized)
            }
        }
    }
}
