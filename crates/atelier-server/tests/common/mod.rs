//! Common test utilities for driving the full router in memory.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use atelier_server::config::ServerConfig;
use atelier_server::handlers::auth::hash_password;
use atelier_server::middleware::auth::TokenCodec;
use atelier_server::middleware::rate_limit::{FixedWindowTracker, ManualClock};
use atelier_server::models::{Role, User};
use atelier_server::routes::create_router;
use atelier_server::state::AppState;
use atelier_server::store::{MemoryClientStore, MemoryProjectStore, MemoryUserStore};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Address most requests claim to come from. Rate limit tests use
/// their own addresses so scenarios never share a window.
pub const TEST_IP: &str = "203.0.113.10";

/// Full application wired to in-memory stores and a hand-driven rate
/// limit clock.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
}

pub fn test_config() -> ServerConfig {
    serde_json::from_value(json!({
        "auth": { "jwt_secret": TEST_SECRET }
    }))
    .expect("test config must deserialize")
}

impl TestApp {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new());
        let state = AppState {
            config: Arc::new(test_config()),
            users: Arc::new(MemoryUserStore::new()),
            clients: Arc::new(MemoryClientStore::new()),
            projects: Arc::new(MemoryProjectStore::new()),
            codec: Arc::new(TokenCodec::new(TEST_SECRET)),
            tracker: Arc::new(FixedWindowTracker::with_clock(clock.clone())),
        };
        let router = create_router(state.clone());
        Self {
            router,
            state,
            clock,
        }
    }

    /// Send one request through the whole middleware stack.
    pub async fn dispatch(
        &self,
        method: &str,
        path: &str,
        ip: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("x-forwarded-for", ip);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .expect("request must build"),
            None => builder.body(Body::empty()).expect("request must build"),
        };
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn post_json(&self, path: &str, body: Value) -> Response {
        self.dispatch("POST", path, TEST_IP, None, Some(body)).await
    }

    pub async fn post_json_as(&self, path: &str, token: &str, body: Value) -> Response {
        self.dispatch("POST", path, TEST_IP, Some(token), Some(body))
            .await
    }

    pub async fn get(&self, path: &str) -> Response {
        self.dispatch("GET", path, TEST_IP, None, None).await
    }

    pub async fn get_as(&self, path: &str, token: &str) -> Response {
        self.dispatch("GET", path, TEST_IP, Some(token), None).await
    }

    pub async fn put_json_as(&self, path: &str, token: &str, body: Value) -> Response {
        self.dispatch("PUT", path, TEST_IP, Some(token), Some(body))
            .await
    }

    pub async fn delete_as(&self, path: &str, token: &str) -> Response {
        self.dispatch("DELETE", path, TEST_IP, Some(token), None)
            .await
    }

    /// Insert a user directly into the store and mint a token for them.
    pub async fn seed_user(&self, name: &str, email: &str, role: Role) -> (User, String) {
        let hash = hash_password("password123").expect("hashing must succeed");
        let user = User::new(
            name.to_owned(),
            email.to_owned(),
            "0123456789".to_owned(),
            hash,
            role,
        );
        let user = self
            .state
            .users
            .insert(user)
            .await
            .expect("seeded email must be unique");
        let token = self
            .state
            .codec
            .issue(user.id)
            .expect("token must be issuable");
        (user, token)
    }

    pub async fn seed_member(&self) -> (User, String) {
        self.seed_user("Member User", "member@example.com", Role::User)
            .await
    }

    pub async fn seed_admin(&self) -> (User, String) {
        self.seed_user("Admin User", "admin@example.com", Role::Admin)
            .await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume a response into its status and JSON body.
pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body must be readable")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body must be JSON")
    };
    (status, value)
}

pub fn signup_payload(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "0123456789",
        "password": "password123",
    })
}

pub fn client_payload(name: &str) -> Value {
    json!({
        "name": name,
        "email": "contact@acme.example",
        "phone": "0123456789",
        "company": "Acme Corp",
    })
}

pub fn project_payload(name: &str, client_id: &str) -> Value {
    json!({
        "name": name,
        "description": "A long enough project description",
        "startDate": "2025-03-01T00:00:00Z",
        "client": client_id,
    })
}
