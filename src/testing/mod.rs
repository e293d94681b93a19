//! In-process harness for router tests.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::app;
use crate::config::AppConfig;
use crate::state::AppState;

/// Router over a fresh in-memory store. `dean@campus.test` is on the admin allow-list.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory(AppConfig::for_tests()).expect("test state");
        Self {
            router: app::router(state.clone()),
            state,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, token, Some(body)).await
    }

    pub async fn register(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/register",
            None,
            json!({
                "fullName": "Test Student",
                "email": email,
                "password": password,
            }),
        )
        .await
    }

    /// Registers `email` and returns its bearer token.
    pub async fn token_for(&self, email: &str) -> String {
        let (status, body) = self.register(email, "password").await;
        assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
        body["data"]["token"].as_str().expect("token").to_string()
    }

    pub fn event_body(capacity: i32) -> Value {
        json!({
            "title": "Hack Night",
            "date": "2030-10-01",
            "time": "18",
            "location": "Engineering Hall",
            "description": "Bring a laptop",
            "category": "technology",
            "capacity": capacity,
        })
    }
}
