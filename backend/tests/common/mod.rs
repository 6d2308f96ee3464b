//! Common test utilities for integration tests
//!
//! This module provides shared setup for integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use triflow_backend::{config::AppConfig, routes, state::AppState};

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    /// Create a new test application with an empty session store
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config);
        let app = routes::create_router(state);
        Self { app }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send(json_request("POST", path, body)).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send(json_request("PATCH", path, body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}

fn json_request(method: &str, path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Parse a response body as JSON
pub fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

/// ISO date `days` from today
pub fn date_in(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// A complete questionnaire for an Olympic-distance race `race_in_days` away
pub fn questionnaire(race_in_days: i64) -> Value {
    json!({
        "age": "34",
        "weight": "72",
        "height": "178",
        "gender": "male",
        "experienceLevel": "intermediate",
        "previousRaces": ["Sprint"],
        "currentTrainingHours": "7-10",
        "primaryGoal": "improve-time",
        "targetRace": "olympic",
        "raceDate": date_in(race_in_days),
        "targetTime": "2:30:00",
        "swimLevel": "intermediate",
        "bikeLevel": "advanced",
        "runLevel": "intermediate",
        "weeklySwimHours": "2",
        "weeklyBikeHours": "4",
        "weeklyRunHours": "2",
        "trainingDays": ["Monday", "Tuesday", "Wednesday", "Thursday", "Saturday", "Sunday"],
        "preferredTrainingTime": "morning",
        "equipment": ["Pool access", "Road bike", "Heart rate monitor"],
        "limitations": "",
        "motivation": "Beat last year's time",
        "previousInjuries": ""
    })
}
