//! Route configuration for the Atelier API server.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::{CatchPanicLayer, ResponseForPanic},
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use tracing::error;

use crate::handlers::{auth, clients, projects, users};
use crate::middleware::{AuthLayer, RateLimitLayer, RatePolicy, RequireRoleLayer};
use crate::state::AppState;

/// Create the main application router.
///
/// Every tier's admission check sits in front of authentication, so an
/// over-limit client is rejected before any token work happens. Within
/// a route group the stack reads top to bottom in execution order.
pub fn create_router(state: AppState) -> Router {
    let trusted_hops = state.config.proxy.trusted_hops;
    let tracker = state.tracker.clone();
    let tier = move |policy: RatePolicy| {
        RateLimitLayer::new(tracker.clone(), policy).with_trusted_hops(trusted_hops)
    };
    let auth_layer = AuthLayer::new(state.codec.clone(), state.resolver());

    Router::new()
        .nest(
            "/api/auth",
            auth_routes().layer(tier(RatePolicy::auth())),
        )
        .nest(
            "/api/clients",
            client_routes().layer(
                ServiceBuilder::new()
                    .layer(tier(RatePolicy::crud()))
                    .layer(auth_layer.clone()),
            ),
        )
        .nest(
            "/api/projects",
            project_routes().layer(
                ServiceBuilder::new()
                    .layer(tier(RatePolicy::crud()))
                    .layer(auth_layer.clone()),
            ),
        )
        .nest(
            "/api/users",
            user_routes(tier(RatePolicy::admin()), auth_layer),
        )
        .route("/api/health", get(health))
        .fallback(fallback)
        // Common middleware applied to all routes. Each layer is added
        // separately so axum normalizes body types between them; the
        // last layer added runs first, so execution order here reads
        // bottom to top.
        .layer(tier(RatePolicy::general()))
        .layer(RequestBodyLimitLayer::new(state.config.server.body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(state.config.server.request_timeout()))
        .layer(CatchPanicLayer::custom(JsonPanicResponder))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
}

fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(clients::create).get(clients::list))
        .route(
            "/:id",
            get(clients::get).put(clients::update).delete(clients::delete),
        )
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(projects::create).get(projects::list))
        .route("/client/:client_id", get(projects::list_by_client))
        .route(
            "/:id",
            get(projects::get)
                .put(projects::update)
                .delete(projects::delete),
        )
}

fn user_routes(admin_tier: RateLimitLayer, auth_layer: AuthLayer) -> Router<AppState> {
    let directory = Router::new().route("/", get(users::list)).layer(
        ServiceBuilder::new()
            .layer(admin_tier)
            .layer(auth_layer.clone())
            .layer(RequireRoleLayer::admin()),
    );
    let profile = Router::new()
        .route("/profile", get(users::profile))
        .layer(auth_layer);
    directory.merge(profile)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Panics surface as the same generic shape as any other internal
/// failure; the payload goes to the log, never the response.
#[derive(Clone, Copy)]
struct JsonPanicResponder;

impl ResponseForPanic for JsonPanicResponder {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response {
        let detail = if let Some(text) = err.downcast_ref::<String>() {
            text.as_str()
        } else if let Some(text) = err.downcast_ref::<&str>() {
            text
        } else {
            "non-string panic payload"
        };
        error!(panic = %detail, "request handler panicked");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
            .into_response()
    }
}
