//! Identity resolution.

use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::store::UserStore;
use std::sync::Arc;
use uuid::Uuid;

/// Turns a verified subject id into a live user record.
///
/// One store read per call, no caching. Any miss surfaces as the same
/// [`ApiError::InvalidToken`] the codec failures map to, so callers cannot
/// tell a deleted user from a bad token.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    /// Build a resolver over the user store.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Look up the user behind a token subject.
    pub async fn resolve(&self, subject: Uuid) -> ApiResult<User> {
        self.users
            .find_by_id(subject)
            .await
            .ok_or(ApiError::InvalidToken)
    }
}
