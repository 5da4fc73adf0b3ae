//! Domain records and their wire-facing views.

pub mod client;
pub mod project;
pub mod user;

pub use client::{Client, ClientDraft, ClientSummary, ClientView};
pub use project::{Project, ProjectDraft, ProjectStatus, ProjectView};
pub use user::{Role, User, UserSummary, UserView};
