//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::middleware::auth::{IdentityResolver, TokenCodec};
use crate::middleware::rate_limit::FixedWindowTracker;
use crate::store::{
    ClientStore, MemoryClientStore, MemoryProjectStore, MemoryUserStore, ProjectStore, UserStore,
};

/// Handles shared by every request.
///
/// Fields are public so tests can assemble a state around their own
/// stores and a hand-driven rate limit clock.
#[derive(Clone)]
pub struct AppState {
    /// Loaded server configuration.
    pub config: Arc<ServerConfig>,
    /// User records.
    pub users: Arc<dyn UserStore>,
    /// Client records.
    pub clients: Arc<dyn ClientStore>,
    /// Project records.
    pub projects: Arc<dyn ProjectStore>,
    /// Token signer/verifier.
    pub codec: Arc<TokenCodec>,
    /// Shared rate limit windows.
    pub tracker: Arc<FixedWindowTracker>,
}

impl AppState {
    /// Assemble the state for a configuration, with in-memory stores.
    pub fn new(config: ServerConfig) -> Self {
        let codec = Arc::new(TokenCodec::new(&config.auth.jwt_secret));
        Self {
            config: Arc::new(config),
            users: Arc::new(MemoryUserStore::new()),
            clients: Arc::new(MemoryClientStore::new()),
            projects: Arc::new(MemoryProjectStore::new()),
            codec,
            tracker: Arc::new(FixedWindowTracker::new()),
        }
    }

    /// Resolver over this state's user store.
    pub fn resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.users.clone())
    }
}
