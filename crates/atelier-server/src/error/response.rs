//! Error response implementation.

use super::types::ApiError;
use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

/// Normalized error body. Exactly what the client sees; no internal detail
/// crosses this boundary.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    retry_after: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            // Full chain stays in the logs; the body gets the generic message.
            error!(
                error = ?self,
                code = self.error_code(),
                "server error"
            );
        } else if matches!(
            self,
            ApiError::NoToken
                | ApiError::InvalidToken
                | ApiError::Forbidden
                | ApiError::InvalidCredentials
        ) {
            warn!(
                error = %self,
                code = self.error_code(),
                "request rejected"
            );
        }

        let status = self.status_code();

        let body = ErrorBody {
            error: self.to_string(),
            retry_after: match &self {
                ApiError::RateLimited { retry_after, .. } => Some(retry_after.clone()),
                _ => None,
            },
        };

        let mut response = (status, Json(body)).into_response();

        if let ApiError::RateLimited { reset_in_secs, .. } = self {
            if let Ok(value) = reset_in_secs.to_string().parse() {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        ApiError::InvalidToken
    }
}
