//! Client resource handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::middleware::Auth;
use crate::models::{Client, ClientView, UserSummary};
use crate::request::{ClientPayload, ValidatedJson};
use crate::state::AppState;

/// Body returned by create and update.
#[derive(Debug, Serialize)]
pub struct ClientMutation {
    message: &'static str,
    client: ClientView,
}

fn not_found() -> ApiError {
    ApiError::NotFound("Client".to_owned())
}

/// Embed the creating user, mirroring what callers expect from the
/// stored record alone.
async fn present(state: &AppState, client: Client) -> ClientView {
    let created_by = state
        .users
        .find_by_id(client.created_by)
        .await
        .map(|user| UserSummary::from(&user));
    ClientView::new(client, created_by)
}

/// Create a client owned by the authenticated caller.
pub async fn create(
    State(state): State<AppState>,
    Auth(user): Auth,
    ValidatedJson(payload): ValidatedJson<ClientPayload>,
) -> ApiResult<(StatusCode, Json<ClientMutation>)> {
    let client = state
        .clients
        .insert(Client::new(payload.into(), user.id))
        .await;
    let client = present(&state, client).await;

    Ok((
        StatusCode::CREATED,
        Json(ClientMutation {
            message: "Client created successfully",
            client,
        }),
    ))
}

/// All clients, newest first.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ClientView>>> {
    let mut clients = state.clients.list().await;
    clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut views = Vec::with_capacity(clients.len());
    for client in clients {
        views.push(present(&state, client).await);
    }
    Ok(Json(views))
}

/// One client by id.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ClientView>> {
    let id = parse_id(&id)?;
    let client = state.clients.get(id).await.ok_or_else(not_found)?;
    Ok(Json(present(&state, client).await))
}

/// Replace a client's editable fields.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ClientPayload>,
) -> ApiResult<Json<ClientMutation>> {
    let id = parse_id(&id)?;
    let client = state
        .clients
        .update(id, payload.into())
        .await
        .ok_or_else(not_found)?;

    Ok(Json(ClientMutation {
        message: "Client updated successfully",
        client: present(&state, client).await,
    }))
}

/// Remove a client.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_id(&id)?;
    state.clients.delete(id).await.ok_or_else(not_found)?;
    Ok(Json(json!({ "message": "Client deleted successfully" })))
}
