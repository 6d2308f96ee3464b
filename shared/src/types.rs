//! API request and response types

use crate::models::{Discipline, Intensity, RaceDistance, SessionType, TrainingSession, Weekday};
use crate::schedule::{SessionSlot, WeekVariant};
use crate::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

// ============================================================================
// Questionnaire
// ============================================================================

/// Raw questionnaire body as posted by the intake form.
///
/// Values stay as strings here; [`crate::intake::normalize`] does the typing.
/// Numbers are accepted where the form would send strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionnaireSubmission {
    #[serde(deserialize_with = "lenient_string")]
    pub age: String,
    #[serde(deserialize_with = "lenient_string")]
    pub weight: String,
    #[serde(deserialize_with = "lenient_string")]
    pub height: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(deserialize_with = "lenient_string")]
    pub experience_level: String,
    pub previous_races: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_training_hours: String,
    #[serde(deserialize_with = "lenient_string")]
    pub primary_goal: String,
    #[serde(deserialize_with = "lenient_string")]
    pub target_race: String,
    #[serde(deserialize_with = "lenient_string")]
    pub race_date: String,
    #[serde(deserialize_with = "lenient_string")]
    pub target_time: String,
    #[serde(deserialize_with = "lenient_string")]
    pub swim_level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub bike_level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub run_level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub weekly_swim_hours: String,
    #[serde(deserialize_with = "lenient_string")]
    pub weekly_bike_hours: String,
    #[serde(deserialize_with = "lenient_string")]
    pub weekly_run_hours: String,
    pub training_days: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub preferred_training_time: String,
    pub equipment: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub limitations: String,
    #[serde(deserialize_with = "lenient_string")]
    pub motivation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub previous_injuries: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Accept a string, number, bool or null where a form string is expected
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

/// One phase as listed by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub name: String,
    pub weeks: u32,
    pub focus: String,
}

/// Training plan in the shape the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanPayload {
    pub id: String,
    pub user_id: String,
    /// "personalized" or "abbreviated"
    pub plan_type: String,
    /// e.g. "12 weeks"
    pub duration: String,
    pub weekly_hours: String,
    pub phases: Vec<PhaseSummary>,
    pub weekly_schedule: BTreeMap<Weekday, SessionSlot>,
}

/// One weekly template in the plan details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetail {
    pub weeks: u32,
    pub variant: WeekVariant,
    pub training_minutes: u32,
    pub schedule: BTreeMap<Weekday, SessionSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDetail {
    pub name: String,
    pub weeks: u32,
    pub focus: String,
    pub weekly_hours: f64,
    pub templates: Vec<TemplateDetail>,
}

/// Everything the plan holds beyond the dashboard payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetails {
    pub created_on: NaiveDate,
    pub race_date: NaiveDate,
    pub race_distance: RaceDistance,
    pub total_weeks: u32,
    pub reference_weekly_hours: f64,
    pub abbreviated: bool,
    pub flags: Vec<String>,
    pub phases: Vec<PhaseDetail>,
}

/// Non-fatal planning issue reported alongside a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanWarning {
    pub code: String,
    pub message: String,
    pub disciplines: Vec<Discipline>,
}

/// Response to a questionnaire submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireResponse {
    pub success: bool,
    pub training_plan: TrainingPlanPayload,
    pub plan_details: PlanDetails,
    pub warnings: Vec<PlanWarning>,
    pub message: String,
}

// ============================================================================
// Training sessions
// ============================================================================

/// Create a training session
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(range(max = 1440, message = "cannot exceed 24 hours"))]
    pub duration: u32,
    pub intensity: Intensity,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    #[validate(length(max = 2000, message = "cannot exceed 2000 characters"))]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(max = 1440, message = "cannot exceed 24 hours"))]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "cannot exceed 2000 characters"))]
    pub notes: Option<String>,
}

impl UpdateSessionRequest {
    pub fn is_empty(&self) -> bool {
        self.session_type.is_none()
            && self.title.is_none()
            && self.duration.is_none()
            && self.intensity.is_none()
            && self.date.is_none()
            && self.completed.is_none()
            && self.notes.is_none()
    }
}

/// Query parameters for listing sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsListResponse {
    pub success: bool,
    pub sessions: Vec<TrainingSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session: TrainingSession,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Errors
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<ValidationError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
