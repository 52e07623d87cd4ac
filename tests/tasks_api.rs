mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{DateTime, Utc};
use rstest::rstest;

use common::test_app;

#[tokio::test]
async fn create_task_returns_pending_task() {
    let app = test_app();
    let before = Utc::now();

    let task = app.create_task("buy-milk").await;

    assert_eq!(task["text"], "buy-milk");
    assert_eq!(task["completed"], false);
    assert!(!task["id"].as_str().unwrap().is_empty());
    let created_at: DateTime<Utc> = task["created_at"].as_str().unwrap().parse().unwrap();
    assert!(created_at >= before);
}

#[tokio::test]
async fn create_task_accepts_form_body() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/tasks")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("text=water+plants"))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    let task: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(task["text"], "water plants");
}

#[rstest]
#[case("/tasks")]
#[case("/tasks?text=")]
#[case("/tasks?text=%20%20")]
#[tokio::test]
async fn create_task_without_text_is_bad_request(#[case] uri: &str) {
    let app = test_app();

    let (status, body) = app.request_json(Method::POST, uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn list_tasks_empty_store_is_empty_list() {
    let app = test_app();

    let (status, body) = app.request_json(Method::GET, "/tasks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn list_tasks_is_newest_first() {
    let app = test_app();
    for text in ["first", "second", "third"] {
        app.create_task(text).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let (_, body) = app.request_json(Method::GET, "/tasks").await;

    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn complete_then_incomplete_keeps_identity() {
    let app = test_app();
    let created = app.create_task("report").await;
    let id = created["id"].as_str().unwrap();

    let (status, completed) = app
        .request_json(Method::POST, &format!("/tasks/{}/complete", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["completed"], true);

    let (status, restored) = app
        .request_json(Method::POST, &format!("/tasks/{}/incomplete", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(restored, created);
}

#[rstest]
#[case(Method::POST, "/tasks/{}/complete")]
#[case(Method::POST, "/tasks/{}/incomplete")]
#[case(Method::DELETE, "/tasks/{}")]
#[tokio::test]
async fn unknown_task_is_not_found(#[case] method: Method, #[case] template: &str) {
    let app = test_app();

    for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let uri = template.replace("{}", &id);
        let (status, body) = app.request_json(method.clone(), &uri).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"detail": "Task not found"}));
    }
}

#[tokio::test]
async fn delete_removes_task_once() {
    let app = test_app();
    let created = app.create_task("temporary").await;
    let uri = format!("/tasks/{}", created["id"].as_str().unwrap());

    let (status, body) = app.request_json(Method::DELETE, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"ok": true}));

    let (_, list) = app.request_json(Method::GET, "/tasks").await;
    assert_eq!(list, serde_json::json!([]));

    let (status, _) = app.request_json(Method::DELETE, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreachable_store_is_service_unavailable() {
    let app = test_app();
    app.store.set_unreachable(true);

    let (status, body) = app.request_json(Method::GET, "/tasks").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].as_str().unwrap().contains("connection"));
}
