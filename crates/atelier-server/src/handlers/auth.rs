//! Signup and login handlers.

use anyhow::Context;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{User, UserView};
use crate::request::{LoginRequest, SignupRequest, ValidatedJson};
use crate::state::AppState;

/// Body returned by both auth endpoints.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    message: &'static str,
    token: String,
    user: UserView,
}

/// Register an account and issue its first token.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    if state.users.find_by_email(&payload.email).await.is_some() {
        return Err(ApiError::Conflict("User already exists".to_owned()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(
        payload.name,
        payload.email,
        payload.phone,
        password_hash,
        payload.role.unwrap_or_default(),
    );
    let user = state.users.insert(user).await?;
    let token = state
        .codec
        .issue(user.id)
        .context("token signing failed")?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            token,
            user: UserView::from(&user),
        }),
    ))
}

/// Uniform failure: an unknown email and a wrong password are
/// indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = state
        .users
        .find_by_email(&payload.email)
        .await
        .ok_or(ApiError::InvalidCredentials)?;
    verify_password(&payload.password, &user.password_hash)?;

    let token = state
        .codec
        .issue(user.id)
        .context("token signing failed")?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user: UserView::from(&user),
    }))
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| ApiError::Internal(anyhow::anyhow!("password hashing failed: {error}")))
}

/// Check a password against the stored hash. A mismatch and an
/// unparseable stored hash both collapse to the credential failure.
pub fn verify_password(password: &str, stored: &str) -> ApiResult<()> {
    let parsed = PasswordHash::new(stored).map_err(|_| ApiError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| ApiError::InvalidCredentials)
}
