//! TriFlow WASM Module
//!
//! Browser bindings for previewing a training plan before submitting the
//! questionnaire. Runs the same pipeline as the backend, minus storage.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use triflow_shared::{
    generate_plan, normalize, periodization, serializer, ErrorDetail, ErrorResponse, PlanError,
    PlanRequest, PlannerPolicy, QuestionnaireSubmission,
};
use wasm_bindgen::prelude::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Preview a plan for a questionnaire submission.
///
/// Returns the same JSON envelope the questionnaire endpoint returns, with
/// a nil plan id. Failures come back as the error envelope.
#[wasm_bindgen]
pub fn preview_plan(submission_json: &str, today_iso: &str) -> String {
    match build_preview(submission_json, today_iso) {
        Ok(json) => json,
        Err(err) => error_envelope(err),
    }
}

/// Whole weeks between today and the race date, or -1 if either date is invalid
#[wasm_bindgen]
pub fn weeks_until(race_iso: &str, today_iso: &str) -> i32 {
    match (parse_date(race_iso), parse_date(today_iso)) {
        (Some(race), Some(today)) => periodization::weeks_until(today, race) as i32,
        _ => -1,
    }
}

enum PreviewError {
    BadInput(String),
    Plan(PlanError),
}

impl From<PlanError> for PreviewError {
    fn from(err: PlanError) -> Self {
        PreviewError::Plan(err)
    }
}

fn build_preview(submission_json: &str, today_iso: &str) -> Result<String, PreviewError> {
    let today = parse_date(today_iso)
        .ok_or_else(|| PreviewError::BadInput(format!("Invalid date: {today_iso}")))?;
    let submission: QuestionnaireSubmission = serde_json::from_str(submission_json)
        .map_err(|e| PreviewError::BadInput(format!("Invalid questionnaire JSON: {e}")))?;

    let intake = normalize(&submission, today)?;
    let plan = generate_plan(&intake, &PlanRequest::preview(today), &PlannerPolicy::default())?;
    Ok(to_json(&serializer::to_response(&plan))?)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, PlanError> {
    Ok(serde_json::to_string(value)?)
}

fn error_envelope(err: PreviewError) -> String {
    let detail = match err {
        PreviewError::BadInput(message) => ErrorDetail {
            code: "BAD_REQUEST".to_string(),
            message,
            fields: None,
            details: None,
        },
        PreviewError::Plan(err) => {
            let code = err.code().to_string();
            let message = err.to_string();
            match err {
                PlanError::Validation { errors } => ErrorDetail {
                    code,
                    message,
                    fields: Some(errors),
                    details: None,
                },
                PlanError::InfeasibleTimeline {
                    weeks_available,
                    minimum_weeks,
                    earliest_feasible_date,
                } => ErrorDetail {
                    code,
                    message,
                    fields: None,
                    details: Some(json!({
                        "weeksAvailable": weeks_available,
                        "minimumWeeks": minimum_weeks,
                        "earliestFeasibleDate": earliest_feasible_date,
                    })),
                },
                PlanError::ScheduleOverconstrained { disciplines } => ErrorDetail {
                    code,
                    message,
                    fields: None,
                    details: Some(json!({ "disciplines": disciplines })),
                },
                PlanError::Serialization(_) => ErrorDetail {
                    code,
                    message,
                    fields: None,
                    details: None,
                },
            }
        }
    };

    let envelope = ErrorResponse {
        success: false,
        message: detail.message.clone(),
        error: detail,
    };
    // ErrorResponse holds only strings and JSON values
    serde_json::to_string(&envelope).unwrap_or_default()
}
