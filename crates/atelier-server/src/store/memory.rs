//! In-memory store implementations.

use super::{ClientStore, ProjectStore, StoreError, StoreResult, UserStore};
use crate::models::{Client, ClientDraft, Project, ProjectDraft, User};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

/// In-memory user store with a unique email index.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
    email_index: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> StoreResult<User> {
        // The index entry guard makes the uniqueness check atomic with the
        // reservation; two concurrent signups for one email cannot both pass.
        match self.email_index.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate { field: "email" }),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                self.users.insert(user.id, user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.email_index.get(email)?.value();
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    async fn list(&self) -> Vec<User> {
        self.users.iter().map(|entry| entry.value().clone()).collect()
    }

    async fn delete(&self, id: Uuid) -> Option<User> {
        let (_, user) = self.users.remove(&id)?;
        self.email_index.remove(&user.email);
        Some(user)
    }
}

/// In-memory client store.
#[derive(Default)]
pub struct MemoryClientStore {
    clients: DashMap<Uuid, Client>,
}

impl MemoryClientStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn insert(&self, client: Client) -> Client {
        self.clients.insert(client.id, client.clone());
        client
    }

    async fn get(&self, id: Uuid) -> Option<Client> {
        self.clients.get(&id).map(|entry| entry.value().clone())
    }

    async fn list(&self) -> Vec<Client> {
        self.clients.iter().map(|entry| entry.value().clone()).collect()
    }

    async fn update(&self, id: Uuid, draft: ClientDraft) -> Option<Client> {
        self.clients.get_mut(&id).map(|mut entry| {
            entry.apply(draft);
            entry.clone()
        })
    }

    async fn delete(&self, id: Uuid) -> Option<Client> {
        self.clients.remove(&id).map(|(_, client)| client)
    }
}

/// In-memory project store.
#[derive(Default)]
pub struct MemoryProjectStore {
    projects: DashMap<Uuid, Project>,
}

impl MemoryProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn insert(&self, project: Project) -> Project {
        self.projects.insert(project.id, project.clone());
        project
    }

    async fn get(&self, id: Uuid) -> Option<Project> {
        self.projects.get(&id).map(|entry| entry.value().clone())
    }

    async fn list(&self) -> Vec<Project> {
        self.projects.iter().map(|entry| entry.value().clone()).collect()
    }

    async fn list_by_client(&self, client: Uuid) -> Vec<Project> {
        self.projects
            .iter()
            .filter(|entry| entry.value().client == client)
            .map(|entry| entry.value().clone())
            .collect()
    }

    async fn update(&self, id: Uuid, draft: ProjectDraft) -> Option<Project> {
        self.projects.get_mut(&id).map(|mut entry| {
            entry.apply(draft);
            entry.clone()
        })
    }

    async fn delete(&self, id: Uuid) -> Option<Project> {
        self.projects.remove(&id).map(|(_, project)| project)
    }
}
