//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use redis_task_api::config::Config;
use redis_task_api::routes;
use redis_task_api::state::AppState;
use redis_task_api::store::InMemoryStore;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
}

pub fn test_app() -> TestApp {
    let config = Config::from_lookup(|_| None).unwrap();
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(config, store.clone()).unwrap();

    TestApp {
        router: routes::app(state.clone()),
        store,
        state,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn response(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.response(request).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn request_json(&self, method: Method, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.request(method, uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    /// Creates a task through the API and returns its JSON representation.
    pub async fn create_task(&self, text: &str) -> serde_json::Value {
        let (status, body) = self
            .request_json(Method::POST, &format!("/tasks?text={}", text))
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}
