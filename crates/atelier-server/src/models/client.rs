//! Client records.

use super::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Stored client record.
#[derive(Debug, Clone)]
pub struct Client {
    /// Record identifier.
    pub id: Uuid,
    /// Contact person name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Company name.
    pub company: String,
    /// Postal address, when known.
    pub address: Option<String>,
    /// User who created the record.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated field set used to create or update a client.
#[derive(Debug, Clone)]
pub struct ClientDraft {
    /// Contact person name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Company name.
    pub company: String,
    /// Postal address, when known.
    pub address: Option<String>,
}

impl Client {
    /// Create a new record with a fresh id and timestamps.
    pub fn new(draft: ClientDraft, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            company: draft.company,
            address: draft.address,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields and bump `updated_at`.
    pub fn apply(&mut self, draft: ClientDraft) {
        self.name = draft.name;
        self.email = draft.email;
        self.phone = draft.phone;
        self.company = draft.company;
        self.address = draft.address;
        self.updated_at = Utc::now();
    }
}

/// Client representation returned by the API, with the creating user embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    /// Record identifier.
    pub id: Uuid,
    /// Contact person name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Company name.
    pub company: String,
    /// Postal address, omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Creating user, `null` if that account no longer exists.
    pub created_by: Option<UserSummary>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ClientView {
    /// Combine a record with its resolved creator.
    pub fn new(client: Client, created_by: Option<UserSummary>) -> Self {
        Self {
            id: client.id,
            name: client.name,
            email: client.email,
            phone: client.phone,
            company: client.company,
            address: client.address,
            created_by,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

/// Abbreviated client embedded in project views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    /// Record identifier.
    pub id: Uuid,
    /// Contact person name.
    pub name: String,
    /// Company name.
    pub company: String,
    /// Contact email.
    pub email: String,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            company: client.company.clone(),
            email: client.email.clone(),
        }
    }
}
