//! Caller identity supplied out of band by an authenticating proxy.

use crate::api::AppState;
use crate::error::ApiError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lore_storage::KeyValueStore;

/// The authenticated user, read from the configured user header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    /// User id.
    pub fn id(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> FromRequestParts<AppState<S>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(state.user_header())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| AuthenticatedUser(id.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}
