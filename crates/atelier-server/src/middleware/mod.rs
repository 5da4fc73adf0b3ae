//! Tower layers that run in front of the route handlers.

pub mod auth;
pub mod rate_limit;

pub use auth::{Auth, AuthLayer, RequireRoleLayer};
pub use rate_limit::{FixedWindowTracker, PolicyTier, RateLimitLayer, RatePolicy};
