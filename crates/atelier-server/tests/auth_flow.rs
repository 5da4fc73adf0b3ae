//! Signup and login flows end to end.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{read_json, signup_payload, TestApp, TEST_IP, TEST_SECRET};
use serde_json::json;
use tower::ServiceExt;

use atelier_server::middleware::auth::Claims;

#[tokio::test]
async fn signup_creates_a_user_and_returns_a_usable_token() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/auth/signup",
            signup_payload("Ada Lovelace", "ada@example.com"),
        )
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["name"], "Ada Lovelace");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, profile) = read_json(app.get_as("/api/users/profile", token).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "ada@example.com");
}

#[tokio::test]
async fn signup_rejects_a_duplicate_email() {
    let app = TestApp::new();

    let first = app
        .post_json(
            "/api/auth/signup",
            signup_payload("Ada Lovelace", "ada@example.com"),
        )
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .post_json(
            "/api/auth/signup",
            signup_payload("Another Ada", "ada@example.com"),
        )
        .await;
    let (status, body) = read_json(second).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "User already exists" }));
    assert_eq!(app.state.users.list().await.len(), 1);
}

#[tokio::test]
async fn signup_honours_an_explicit_admin_role() {
    let app = TestApp::new();

    let mut payload = signup_payload("Root User", "root@example.com");
    payload["role"] = json!("admin");

    let (status, body) = read_json(app.post_json("/api/auth/signup", payload).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "admin");

    let token = body["token"].as_str().unwrap();
    assert_eq!(
        app.get_as("/api/users", token).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn signup_surfaces_the_first_field_violation() {
    let app = TestApp::new();

    let (status, body) = read_json(
        app.post_json(
            "/api/auth/signup",
            signup_payload("A", "ada@example.com"),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "name must be between 2 and 50 characters" })
    );
}

#[tokio::test]
async fn malformed_json_bodies_are_a_validation_failure() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("x-forwarded-for", TEST_IP)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials() {
    let app = TestApp::new();
    app.seed_member().await;

    let response = app
        .post_json(
            "/api/auth/login",
            json!({ "email": "member@example.com", "password": "password123" }),
        )
        .await;
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "member@example.com");

    let token = body["token"].as_str().unwrap();
    assert_eq!(
        app.get_as("/api/users/profile", token).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let app = TestApp::new();
    app.seed_member().await;

    let unknown = read_json(
        app.post_json(
            "/api/auth/login",
            json!({ "email": "ghost@example.com", "password": "password123" }),
        )
        .await,
    )
    .await;
    let wrong = read_json(
        app.post_json(
            "/api/auth/login",
            json!({ "email": "member@example.com", "password": "not-the-password" }),
        )
        .await,
    )
    .await;

    assert_eq!(unknown.0, StatusCode::BAD_REQUEST);
    assert_eq!(unknown, wrong);
    assert_eq!(unknown.1, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn issued_tokens_carry_a_seven_day_expiry() {
    let app = TestApp::new();
    let (_user, _) = app.seed_member().await;

    let (_, body) = read_json(
        app.post_json(
            "/api/auth/login",
            json!({ "email": "member@example.com", "password": "password123" }),
        )
        .await,
    )
    .await;
    let token = body["token"].as_str().unwrap();

    let decoded = jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(TEST_SECRET.as_bytes()),
        &jsonwebtoken::Validation::default(),
    )
    .unwrap();

    assert_eq!(decoded.claims.exp - decoded.claims.iat, 7 * 24 * 3600);
}

#[tokio::test]
async fn two_logins_yield_independently_valid_tokens() {
    let app = TestApp::new();
    let (user, _) = app.seed_member().await;

    let first = app.state.codec.issue(user.id).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let second = app.state.codec.issue(user.id).unwrap();

    assert_ne!(first, second);
    assert_eq!(
        app.get_as("/api/users/profile", &first).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        app.get_as("/api/users/profile", &second).await.status(),
        StatusCode::OK
    );
}
