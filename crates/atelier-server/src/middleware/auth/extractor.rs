//! Handler-side extractor for the authenticated user.

use super::types::CurrentUser;
use crate::error::ApiError;
use crate::models::User;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Extracts the user the access gate attached to the request.
///
/// Routes using this must be wrapped in
/// [`AuthLayer`](super::AuthLayer); on an unwrapped route the extractor
/// rejects as if no credential was presented.
#[derive(Debug)]
pub struct Auth(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .map(|current| Auth(current.0.clone()))
            .ok_or(ApiError::NoToken)
    }
}
