mod common;

use axum::http::{Method, StatusCode};

use common::test_app;

#[tokio::test]
async fn scrape_recomputes_task_gauges() {
    let app = test_app();
    let mut ids = Vec::new();
    for text in ["a", "b", "c", "d"] {
        let task = app.create_task(text).await;
        ids.push(task["id"].as_str().unwrap().to_string());
    }
    for id in &ids[..3] {
        app.request(Method::POST, &format!("/tasks/{}/complete", id))
            .await;
    }

    let (status, body) = app.request(Method::GET, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("tasks_current 4"));
    assert!(body.contains("tasks_pending 1"));
    assert!(body.contains("tasks_created_total 4"));
    assert!(body.contains("tasks_completed_total 3"));
}

#[tokio::test]
async fn request_paths_are_labelled_with_route_templates() {
    let app = test_app();
    let task = app.create_task("label").await;
    let id = task["id"].as_str().unwrap();
    let simple_id = uuid::Uuid::parse_str(id).unwrap().simple().to_string();

    app.request(Method::POST, &format!("/tasks/{}/complete", id))
        .await;
    app.request(Method::POST, &format!("/tasks/{}/complete", simple_id))
        .await;
    let (_, body) = app.request(Method::GET, "/metrics").await;

    assert!(body.contains(
        r#"http_requests_total{method="POST",path="/tasks/{id}/complete",status="200"} 2"#
    ));
    assert!(!body.contains(id));
    assert!(!body.contains(&simple_id));
}

#[tokio::test]
async fn distinct_keys_and_unknown_paths_share_labels() {
    let app = test_app();

    for n in 0..3 {
        app.request(Method::GET, &format!("/get/key{}", n)).await;
        app.request(Method::POST, &format!("/tasks/junk{}/complete", n))
            .await;
        app.request(Method::GET, &format!("/random/{}", n)).await;
    }
    let (_, body) = app.request(Method::GET, "/metrics").await;

    assert!(body.contains(
        r#"http_requests_total{method="GET",path="/get/{key}",status="200"} 3"#
    ));
    assert!(body.contains(
        r#"http_requests_total{method="POST",path="/tasks/{id}/complete",status="404"} 3"#
    ));
    assert!(body.contains(
        r#"http_requests_total{method="GET",path="unmatched",status="404"} 3"#
    ));
    assert!(!body.contains("key0"));
    assert!(!body.contains("junk0"));
    assert!(!body.contains("/random"));
}

#[tokio::test]
async fn unknown_paths_return_not_found_detail() {
    let app = test_app();

    let (status, body) = app.request_json(Method::GET, "/random/path").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, serde_json::json!({"detail": "Not Found"}));
}

#[tokio::test]
async fn scrape_still_exports_counters_when_store_is_down() {
    let app = test_app();
    app.create_task("before outage").await;
    let (_, body) = app.request(Method::GET, "/metrics").await;
    assert!(body.contains("tasks_current 1"));

    app.store.set_unreachable(true);
    let (status, _) = app.request(Method::GET, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = app.request(Method::GET, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("health_check_failures_total 1"));
    assert!(body.contains("tasks_created_total 1"));
    assert!(body.contains("tasks_current 1"));
}

#[tokio::test]
async fn scrape_is_not_instrumented() {
    let app = test_app();

    app.request(Method::GET, "/metrics").await;
    let (_, body) = app.request(Method::GET, "/metrics").await;

    assert!(!body.contains(r#"path="/metrics""#));
}
