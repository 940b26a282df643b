//! Shared fixtures for handler tests.
use crate::crypto;
use crate::db::memory::MemoryStore;
use crate::db::SurveyStore;
use crate::domain::models::{NewUser, User, UserRole};
use crate::state::{AppState, SharedState};
use crate::web::session::TokenService;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "s3cret-pass";
pub const FRONTEND_URL: &str = "https://survey.example.com";

pub fn test_state(store: Arc<MemoryStore>) -> SharedState {
    Arc::new(AppState {
        store,
        tokens: TokenService::new(TEST_SECRET),
        frontend_url: FRONTEND_URL.to_string(),
    })
}

pub async fn create_admin(store: &MemoryStore) -> User {
    store
        .insert_user(NewUser {
            name: "Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: crypto::hash_password(ADMIN_PASSWORD).unwrap(),
            role: UserRole::Admin,
        })
        .await
        .unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn login_request(email: &str, password: &str) -> Request<Body> {
    let form = format!(
        "grant_type=password&username={}&password={}",
        email.replace('@', "%40"),
        password
    );
    Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap()
}

/// Sends a request and returns the status with the JSON body (`Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
