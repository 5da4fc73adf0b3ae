//! User directory handlers.

use axum::extract::State;
use axum::Json;

use crate::middleware::Auth;
use crate::models::UserView;
use crate::state::AppState;

/// Full directory, admin only. Role enforcement happens in the route
/// stack before this handler runs.
pub async fn list(State(state): State<AppState>) -> Json<Vec<UserView>> {
    let mut users = state.users.list().await;
    users.sort_by_key(|user| user.created_at);
    Json(users.iter().map(UserView::from).collect())
}

/// The authenticated caller's own record.
pub async fn profile(Auth(user): Auth) -> Json<UserView> {
    Json(UserView::from(&user))
}
