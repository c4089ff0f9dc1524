#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderName, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use resume_builder::auth::TrustedHeaderAuthenticator;
use resume_builder::config::{Config, OwnershipPolicy, StorageBackend};
use resume_builder::resumes::store::MemoryResumeStore;
use resume_builder::routes::build_router;
use resume_builder::state::AppState;

pub const USER_HEADER: &str = "x-authenticated-user";

pub fn test_config(ownership_policy: OwnershipPolicy) -> Config {
    Config {
        storage: StorageBackend::Memory,
        database_url: None,
        auth_user_header: USER_HEADER.to_string(),
        ownership_policy,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn test_app(ownership_policy: OwnershipPolicy) -> Router {
    build_router(AppState {
        store: Arc::new(MemoryResumeStore::new()),
        authenticator: Arc::new(TrustedHeaderAuthenticator::new(HeaderName::from_static(
            USER_HEADER,
        ))),
        config: test_config(ownership_policy),
    })
}

/// Sends one request through the router and returns the status and JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn resume_body(title: &str) -> Value {
    json!({
        "title": title,
        "personalInfo": {
            "fullName": "Jane Doe",
            "email": "jane@example.com",
            "phone": "",
            "location": "",
            "summary": ""
        },
        "experience": [],
        "education": [],
        "skills": ["a", "b"]
    })
}
