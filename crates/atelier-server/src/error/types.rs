//! API error types.

use crate::store::StoreError;
use axum::http::StatusCode;
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Every failure kind that may cross the HTTP boundary.
///
/// The `#[error]` strings are the exact wire messages; handlers and
/// middleware construct variants and never format bodies themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token on a protected route (401).
    #[error("Access denied. No token provided.")]
    NoToken,

    /// Malformed, expired, or forged credential, or one whose subject no
    /// longer resolves to a user (401). Deliberately one variant: callers
    /// must not be able to tell which check failed.
    #[error("Invalid token.")]
    InvalidToken,

    /// Authenticated but lacking the required role (403).
    #[error("Access denied. Admin privileges required.")]
    Forbidden,

    /// Unknown email or wrong password, uniformly (400).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Request body failed validation; carries the field message (400).
    #[error("{0}")]
    Validation(String),

    /// Path parameter is not a well-formed id (400).
    #[error("Invalid ID format")]
    InvalidId,

    /// State conflict with a fixed message, such as a signup for an
    /// existing account (400).
    #[error("{0}")]
    Conflict(String),

    /// Unique-field collision detected by a store (400).
    #[error("{0} already exists")]
    DuplicateField(String),

    /// Named entity does not exist (404).
    #[error("{0} not found")]
    NotFound(String),

    /// Over the rate limit for a policy tier (429).
    #[error("{message}")]
    RateLimited {
        /// Tier-specific rejection message.
        message: String,
        /// Human-readable hint placed in the response body (`retryAfter`).
        retry_after: String,
        /// Seconds until the window resets, for the `Retry-After` header.
        reset_in_secs: u64,
    },

    /// Anything unexpected (500). The chain is logged; the body carries
    /// only the generic message.
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NoToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidCredentials
            | Self::Validation(_)
            | Self::InvalidId
            | Self::Conflict(_)
            | Self::DuplicateField(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code used in logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoToken => "no_token",
            Self::InvalidToken => "invalid_token",
            Self::Forbidden => "forbidden",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Validation(_) => "validation_failed",
            Self::InvalidId => "invalid_id",
            Self::Conflict(_) => "conflict",
            Self::DuplicateField(_) => "duplicate_field",
            Self::NotFound(_) => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Check if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => Self::DuplicateField(field.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
