//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting pipeline and internal errors to HTTP responses with the
//! `{ success: false, message, error }` envelope.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use triflow_shared::{
    validation::from_validation_errors, ErrorDetail, ErrorResponse, PlanError, ValidationError,
};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Validation failed")]
    Validation(Vec<ValidationError>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Plan(PlanError::Validation { .. }) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Plan(PlanError::InfeasibleTimeline { .. })
            | ApiError::Plan(PlanError::ScheduleOverconstrained { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Plan(PlanError::Serialization(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn detail(&self) -> ErrorDetail {
        let internal = || "An internal error occurred".to_string();
        let (code, message, fields, details) = match self {
            ApiError::Validation(errors) => (
                "VALIDATION_ERROR",
                "One or more fields are invalid".to_string(),
                Some(errors.clone()),
                None,
            ),
            ApiError::Plan(err) => match err {
                PlanError::Validation { errors } => (
                    err.code(),
                    "One or more fields are invalid".to_string(),
                    Some(errors.clone()),
                    None,
                ),
                PlanError::InfeasibleTimeline {
                    weeks_available,
                    minimum_weeks,
                    earliest_feasible_date,
                } => (
                    err.code(),
                    err.to_string(),
                    None,
                    Some(json!({
                        "weeksAvailable": weeks_available,
                        "minimumWeeks": minimum_weeks,
                        "earliestFeasibleDate": earliest_feasible_date,
                    })),
                ),
                PlanError::ScheduleOverconstrained { disciplines } => (
                    err.code(),
                    err.to_string(),
                    None,
                    Some(json!({ "disciplines": disciplines })),
                ),
                PlanError::Serialization(_) => (err.code(), internal(), None, None),
            },
            ApiError::NotFound(msg) => ("NOT_FOUND", msg.clone(), None, None),
            ApiError::BadRequest(msg) => ("BAD_REQUEST", msg.clone(), None, None),
            ApiError::Internal(_) => ("INTERNAL_ERROR", internal(), None, None),
        };

        ErrorDetail {
            code: code.to_string(),
            message,
            fields,
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(err) => error!("Internal error: {:?}", err),
            ApiError::Plan(PlanError::Serialization(msg)) => {
                error!("Serialization error: {}", msg)
            }
            other => warn!(error = %other, "Request rejected"),
        }

        let status = self.status();
        let detail = self.detail();
        let message = match &detail.fields {
            Some(fields) if !fields.is_empty() => fields
                .iter()
                .map(|f| f.user_message())
                .collect::<Vec<_>>()
                .join("; "),
            _ => detail.message.clone(),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: detail,
        });

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(from_validation_errors(&errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use triflow_shared::Discipline;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let error = ApiError::Plan(PlanError::Validation {
            errors: vec![
                ValidationError::new("age", "is required"),
                ValidationError::new("raceDate", "must be after today"),
            ],
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["fields"].as_array().unwrap().len(), 2);
        assert_eq!(body["error"]["fields"][1]["field"], "raceDate");
        assert_eq!(
            body["message"],
            "Age: is required; Race Date: must be after today"
        );
    }

    #[tokio::test]
    async fn test_infeasible_timeline_is_unprocessable() {
        let error = ApiError::Plan(PlanError::InfeasibleTimeline {
            weeks_available: 2,
            minimum_weeks: 4,
            earliest_feasible_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        });
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INFEASIBLE_TIMELINE");
        assert_eq!(body["error"]["details"]["earliestFeasibleDate"], "2025-04-01");
        assert_eq!(body["error"]["details"]["weeksAvailable"], 2);
    }

    #[rstest]
    #[case(ApiError::NotFound("Session not found".to_string()), StatusCode::NOT_FOUND)]
    #[case(ApiError::BadRequest("No fields to update".to_string()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Validation(vec![]), StatusCode::BAD_REQUEST)]
    #[case(
        ApiError::Plan(PlanError::ScheduleOverconstrained { disciplines: vec![Discipline::Run] }),
        StatusCode::UNPROCESSABLE_ENTITY
    )]
    #[case(
        ApiError::Plan(PlanError::Serialization("eof".to_string())),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_error_status(#[case] error: ApiError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("Session not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let error = ApiError::Internal(anyhow::anyhow!("lock poisoned"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }
}
