//! Questionnaire API routes

use crate::error::ApiResult;
use crate::services::PlanService;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use chrono::Utc;
use triflow_shared::{QuestionnaireResponse, QuestionnaireSubmission};

/// Create questionnaire routes
pub fn questionnaire_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_questionnaire))
}

/// POST /api/questionnaire - Generate a training plan
async fn submit_questionnaire(
    State(state): State<AppState>,
    payload: Result<Json<QuestionnaireSubmission>, JsonRejection>,
) -> ApiResult<Json<QuestionnaireResponse>> {
    let Json(submission) = payload?;
    let today = Utc::now().date_naive();
    let response = PlanService::generate(&submission, state.planner(), today)?;
    Ok(Json(response))
}
