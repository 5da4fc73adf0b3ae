//! Request data transfer objects and the validating JSON extractor.

use axum::async_trait;
use axum::extract::{FromRequest, Json, Request};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;
use crate::models::{ClientDraft, ProjectDraft, ProjectStatus, Role};

/// JSON body that has passed both deserialization and field validation.
///
/// Malformed bodies and rule violations both surface as 400 responses;
/// a rule violation carries the first violated field's message.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        value.validate().map_err(first_violation)?;
        Ok(ValidatedJson(value))
    }
}

/// Pick one violation to report. Field order in [`ValidationErrors`] is
/// a hash map, so keys are sorted to keep the choice stable.
fn first_violation(errors: ValidationErrors) -> ApiError {
    let fields = errors.field_errors();
    let mut names: Vec<_> = fields.keys().collect();
    names.sort();

    let message = names
        .first()
        .and_then(|name| fields.get(**name))
        .and_then(|violations| violations.first())
        .and_then(|violation| violation.message.as_ref())
        .map(|message| message.to_string())
        .unwrap_or_else(|| "Invalid request body".to_owned());
    ApiError::Validation(message)
}

/// Account registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 50, message = "name must be between 2 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email"))]
    pub email: String,
    #[validate(length(
        min = 10,
        max = 15,
        message = "phone must be between 10 and 15 characters"
    ))]
    pub phone: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Credential check.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is not allowed to be empty"))]
    pub password: String,
}

/// Client create/replace payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientPayload {
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email"))]
    pub email: String,
    #[validate(length(
        min = 10,
        max = 15,
        message = "phone must be between 10 and 15 characters"
    ))]
    pub phone: String,
    #[validate(length(
        min = 2,
        max = 100,
        message = "company must be between 2 and 100 characters"
    ))]
    pub company: String,
    #[validate(length(max = 200, message = "address must be at most 200 characters"))]
    #[serde(default)]
    pub address: Option<String>,
}

impl From<ClientPayload> for ClientDraft {
    fn from(payload: ClientPayload) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            company: payload.company,
            address: payload.address,
        }
    }
}

/// Project create/replace payload.
///
/// The end-date ordering rule spans two fields and lives in
/// [`ProjectPayload::check_dates`], which handlers call after the
/// single-field rules pass.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectPayload {
    #[validate(length(min = 2, max = 100, message = "name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(
        min = 10,
        max = 500,
        message = "description must be between 10 and 500 characters"
    ))]
    pub description: String,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "budget must be greater than or equal to 0"))]
    #[serde(default)]
    pub budget: Option<f64>,
    pub client: Uuid,
}

impl ProjectPayload {
    /// Enforce the cross-field date ordering rule.
    pub fn check_dates(&self) -> Result<(), ApiError> {
        if let Some(end_date) = self.end_date {
            if end_date <= self.start_date {
                return Err(ApiError::Validation(
                    "endDate must be greater than startDate".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

impl From<ProjectPayload> for ProjectDraft {
    fn from(payload: ProjectPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            status: payload.status.unwrap_or_default(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            budget: payload.budget,
            client: payload.client,
        }
    }
}
