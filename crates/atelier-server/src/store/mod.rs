//! Record stores.
//!
//! The access-control core and the handlers only see these traits; the
//! in-memory backend in [`memory`] is the process-lifetime implementation.

pub mod memory;

use crate::models::{Client, ClientDraft, Project, ProjectDraft, User};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::{MemoryClientStore, MemoryProjectStore, MemoryUserStore};

/// Store operation failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field already holds this value.
    #[error("{field} already exists")]
    Duplicate {
        /// Name of the colliding field.
        field: &'static str,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// User record store. `insert` enforces email uniqueness.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user; fails if the email is taken.
    async fn insert(&self, user: User) -> StoreResult<User>;
    /// Look up by id.
    async fn find_by_id(&self, id: Uuid) -> Option<User>;
    /// Look up by email.
    async fn find_by_email(&self, email: &str) -> Option<User>;
    /// All users, unordered.
    async fn list(&self) -> Vec<User>;
    /// Remove and return a user.
    async fn delete(&self, id: Uuid) -> Option<User>;
}

/// Client record store.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Persist a new client.
    async fn insert(&self, client: Client) -> Client;
    /// Look up by id.
    async fn get(&self, id: Uuid) -> Option<Client>;
    /// All clients, unordered.
    async fn list(&self) -> Vec<Client>;
    /// Replace the editable fields of an existing client.
    async fn update(&self, id: Uuid, draft: ClientDraft) -> Option<Client>;
    /// Remove and return a client.
    async fn delete(&self, id: Uuid) -> Option<Client>;
}

/// Project record store.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist a new project.
    async fn insert(&self, project: Project) -> Project;
    /// Look up by id.
    async fn get(&self, id: Uuid) -> Option<Project>;
    /// All projects, unordered.
    async fn list(&self) -> Vec<Project>;
    /// Projects belonging to one client, unordered.
    async fn list_by_client(&self, client: Uuid) -> Vec<Project>;
    /// Replace the editable fields of an existing project.
    async fn update(&self, id: Uuid, draft: ProjectDraft) -> Option<Project>;
    /// Remove and return a project.
    async fn delete(&self, id: Uuid) -> Option<Project>;
}
