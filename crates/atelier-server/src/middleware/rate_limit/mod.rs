//! Multi-tier request rate limiting.
//!
//! One parameterized fixed-window tracker, instantiated per policy tier.
//! Admission runs at the transport edge before authentication; tiers that
//! discriminate by outcome settle their accounting after the response.

pub mod clock;
pub mod layer;
pub mod policy;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use layer::{RateLimitLayer, RateLimitMiddleware};
pub use policy::{PolicyTier, RatePolicy};
pub use store::{Admission, FixedWindowTracker};
