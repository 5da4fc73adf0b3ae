//! API error handling.
//!
//! [`ApiError`] is the closed set of failure kinds that may reach the HTTP
//! boundary; its `IntoResponse` impl in [`response`] is the only place an
//! error body is written.

pub mod response;
pub mod types;

pub use types::{ApiError, ApiResult};
