//! Project records.

use super::client::ClientSummary;
use super::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Not yet started. The default for new projects.
    Planning,
    /// Actively being worked on.
    InProgress,
    /// Delivered.
    Completed,
    /// Paused.
    OnHold,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

/// Stored project record.
#[derive(Debug, Clone)]
pub struct Project {
    /// Record identifier.
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// What the project is about.
    pub description: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Scheduled end, strictly after the start when set.
    pub end_date: Option<DateTime<Utc>>,
    /// Agreed budget, when known.
    pub budget: Option<f64>,
    /// Client this project belongs to.
    pub client: Uuid,
    /// User who created the record.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated field set used to create or update a project.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    /// Project name.
    pub name: String,
    /// What the project is about.
    pub description: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Scheduled end, strictly after the start when set.
    pub end_date: Option<DateTime<Utc>>,
    /// Agreed budget, when known.
    pub budget: Option<f64>,
    /// Client this project belongs to.
    pub client: Uuid,
}

impl Project {
    /// Create a new record with a fresh id and timestamps.
    pub fn new(draft: ProjectDraft, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            budget: draft.budget,
            client: draft.client,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields and bump `updated_at`.
    pub fn apply(&mut self, draft: ProjectDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.status = draft.status;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.budget = draft.budget;
        self.client = draft.client;
        self.updated_at = Utc::now();
    }
}

/// Project representation returned by the API, with the client and creating
/// user embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    /// Record identifier.
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// What the project is about.
    pub description: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Scheduled end, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Agreed budget, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Owning client, `null` if that record no longer exists.
    pub client: Option<ClientSummary>,
    /// Creating user, `null` if that account no longer exists.
    pub created_by: Option<UserSummary>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ProjectView {
    /// Combine a record with its resolved client and creator.
    pub fn new(
        project: Project,
        client: Option<ClientSummary>,
        created_by: Option<UserSummary>,
    ) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
            budget: project.budget,
            client,
            created_by,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(ProjectStatus::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
        assert_eq!(
            serde_json::from_value::<ProjectStatus>(serde_json::json!("on-hold")).unwrap(),
            ProjectStatus::OnHold
        );
    }

    #[test]
    fn default_status_is_planning() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Planning);
    }
}
