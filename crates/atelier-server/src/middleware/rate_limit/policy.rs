//! Tier definitions and their published limits.

use std::time::Duration;

const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);
const ONE_HOUR: Duration = Duration::from_secs(60 * 60);

/// Route-class tier a window is accounted under.
///
/// Part of the tracker key, so the same client address holds an
/// independent window per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyTier {
    /// Baseline tier every request passes through.
    General,
    /// Signup and login.
    Auth,
    /// Client and project resource routes.
    Crud,
    /// Admin-only routes.
    Admin,
    /// Reserved for a future password-reset endpoint.
    PasswordReset,
}

impl PolicyTier {
    /// Stable name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyTier::General => "general",
            PolicyTier::Auth => "auth",
            PolicyTier::Crud => "crud",
            PolicyTier::Admin => "admin",
            PolicyTier::PasswordReset => "password-reset",
        }
    }
}

/// Per-tier limiting policy, fixed for the process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct RatePolicy {
    /// Tier the policy belongs to.
    pub tier: PolicyTier,
    /// Window length.
    pub window: Duration,
    /// Slots available per window.
    pub max_count: u32,
    /// Whether 2xx/3xx outcomes consume a slot.
    pub counts_successes: bool,
    /// Whether 4xx/5xx outcomes consume a slot.
    pub counts_failures: bool,
    /// Rejection body message.
    pub message: &'static str,
    /// Human-readable retry hint carried in the rejection body.
    pub retry_after: &'static str,
}

impl RatePolicy {
    /// Baseline tier applied to every request.
    pub const fn general() -> Self {
        Self {
            tier: PolicyTier::General,
            window: FIFTEEN_MINUTES,
            max_count: 100,
            counts_successes: true,
            counts_failures: true,
            message: "Too many requests from this IP, please try again later.",
            retry_after: "15 minutes",
        }
    }

    /// Signup and login. Counts only failed attempts, so a client
    /// logging in successfully many times is never throttled here.
    pub const fn auth() -> Self {
        Self {
            tier: PolicyTier::Auth,
            window: FIFTEEN_MINUTES,
            max_count: 5,
            counts_successes: false,
            counts_failures: true,
            message: "Too many authentication attempts from this IP, please try again later.",
            retry_after: "15 minutes",
        }
    }

    /// Client and project resource routes.
    pub const fn crud() -> Self {
        Self {
            tier: PolicyTier::Crud,
            window: FIFTEEN_MINUTES,
            max_count: 50,
            counts_successes: true,
            counts_failures: true,
            message: "Too many requests from this IP, please try again later.",
            retry_after: "15 minutes",
        }
    }

    /// Admin-only routes.
    pub const fn admin() -> Self {
        Self {
            tier: PolicyTier::Admin,
            window: FIFTEEN_MINUTES,
            max_count: 30,
            counts_successes: true,
            counts_failures: true,
            message: "Too many admin requests from this IP, please try again later.",
            retry_after: "15 minutes",
        }
    }

    /// Reserved tier. No route is attached to it yet; the policy exists
    /// so a future password-reset endpoint inherits the tight window.
    pub const fn password_reset() -> Self {
        Self {
            tier: PolicyTier::PasswordReset,
            window: ONE_HOUR,
            max_count: 3,
            counts_successes: true,
            counts_failures: true,
            message: "Too many password reset attempts from this IP, please try again later.",
            retry_after: "1 hour",
        }
    }

    /// Policy for a tier.
    pub const fn for_tier(tier: PolicyTier) -> Self {
        match tier {
            PolicyTier::General => Self::general(),
            PolicyTier::Auth => Self::auth(),
            PolicyTier::Crud => Self::crud(),
            PolicyTier::Admin => Self::admin(),
            PolicyTier::PasswordReset => Self::password_reset(),
        }
    }

    /// True when every outcome consumes a slot. Such tiers charge the
    /// slot at admission time; outcome-discriminating tiers settle after
    /// the response instead.
    pub const fn counts_all(&self) -> bool {
        self.counts_successes && self.counts_failures
    }

    /// Whether a response outcome consumes a slot under this policy.
    pub const fn counts_outcome(&self, success: bool) -> bool {
        if success {
            self.counts_successes
        } else {
            self.counts_failures
        }
    }
}
