//! Request handlers.

pub mod auth;
pub mod clients;
pub mod projects;
pub mod users;

use crate::error::ApiError;
use uuid::Uuid;

/// Parse a path identifier. Malformed input maps to the stable 400
/// shape rather than a routing error.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId)
}
