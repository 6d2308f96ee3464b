//! Integration tests for training session endpoints

mod common;

use axum::http::StatusCode;
use common::{parse, TestApp};
use serde_json::{json, Value};

async fn create(app: &TestApp, body: Value) -> Value {
    let (status, response) = app
        .post("/api/training/sessions", &body.to_string())
        .await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    parse(&response)["session"].clone()
}

fn swim_session(date: &str) -> Value {
    json!({
        "type": "swim",
        "title": "Technique Focus",
        "duration": 60,
        "intensity": "moderate",
        "date": date,
        "notes": "Focus on catch and pull technique",
        "userId": "user-123"
    })
}

#[tokio::test]
async fn test_create_session() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/training/sessions", &swim_session("2024-01-15").to_string())
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let body = parse(&body);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Session created successfully");
    assert_eq!(body["session"]["type"], "swim");
    assert_eq!(body["session"]["completed"], false);
    assert!(body["session"]["id"]
        .as_str()
        .unwrap()
        .starts_with("session-"));
    assert!(body["session"]["createdAt"].is_string());
}

#[tokio::test]
async fn test_list_sessions_by_range() {
    let app = TestApp::new();
    create(&app, swim_session("2024-01-10")).await;
    let inside = create(&app, swim_session("2024-01-15")).await;
    create(&app, swim_session("2024-02-01")).await;

    let (status, body) = app
        .get("/api/training/sessions?startDate=2024-01-14&endDate=2024-01-21")
        .await;

    assert_eq!(status, StatusCode::OK);
    let body = parse(&body);
    assert_eq!(body["success"], true);
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"], inside["id"]);
}

#[tokio::test]
async fn test_list_filters_by_user() {
    let app = TestApp::new();
    create(&app, swim_session("2024-01-15")).await;
    let mut other = swim_session("2024-01-15");
    other["userId"] = json!("user-999");
    create(&app, other).await;

    let (_, body) = app.get("/api/training/sessions?userId=user-999").await;

    let sessions = parse(&body)["sessions"].as_array().unwrap().clone();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["userId"], "user-999");
}

#[tokio::test]
async fn test_patch_updates_given_fields() {
    let app = TestApp::new();
    let session = create(&app, swim_session("2024-01-15")).await;
    let path = format!("/api/training/sessions/{}", session["id"].as_str().unwrap());

    let (status, body) = app
        .patch(&path, &json!({ "completed": true, "duration": 75 }).to_string())
        .await;

    assert_eq!(status, StatusCode::OK);
    let body = parse(&body);
    assert_eq!(body["message"], "Session updated successfully");
    assert_eq!(body["session"]["completed"], true);
    assert_eq!(body["session"]["duration"], 75);
    assert_eq!(body["session"]["title"], "Technique Focus");
    assert_eq!(body["session"]["createdAt"], session["createdAt"]);
}

#[tokio::test]
async fn test_delete_then_patch_is_not_found() {
    let app = TestApp::new();
    let session = create(&app, swim_session("2024-01-15")).await;
    let path = format!("/api/training/sessions/{}", session["id"].as_str().unwrap());

    let (status, body) = app.delete(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["message"], "Session deleted successfully");

    let (status, body) = app
        .patch(&path, &json!({ "completed": true }).to_string())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse(&body)["error"]["code"], "NOT_FOUND");

    let (status, _) = app.delete(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_session_is_rejected() {
    let app = TestApp::new();
    let mut body = swim_session("2024-01-15");
    body["duration"] = json!(5000);

    let (status, response) = app
        .post("/api/training/sessions", &body.to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response = parse(&response);
    assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(response["error"]["fields"][0]["field"], "duration");
}

#[tokio::test]
async fn test_unknown_session_type_is_bad_request() {
    let app = TestApp::new();
    let mut body = swim_session("2024-01-15");
    body["type"] = json!("yoga");

    let (status, _) = app
        .post("/api/training/sessions", &body.to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_query_date_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/training/sessions?startDate=soon").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse(&body)["success"], false);
}
