//! Error types for the TriFlow plan pipeline

use crate::models::Discipline;
use crate::validation::ValidationError;
use chrono::NaiveDate;
use thiserror::Error;

/// Failures reported by the plan pipeline.
///
/// All variants are per-request; none is fatal to the process and none is
/// worth retrying since the pipeline is deterministic.
#[derive(Error, Debug, Clone)]
pub enum PlanError {
    #[error("Validation failed: {}", summarize(.errors))]
    Validation { errors: Vec<ValidationError> },

    #[error(
        "Race date is too close: {weeks_available} week(s) available, at least {minimum_weeks} needed (earliest feasible race date {earliest_feasible_date})"
    )]
    InfeasibleTimeline {
        weeks_available: u32,
        minimum_weeks: u32,
        earliest_feasible_date: NaiveDate,
    },

    #[error("Schedule is overconstrained, cannot fit: {}", join_disciplines(.disciplines))]
    ScheduleOverconstrained { disciplines: Vec<Discipline> },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PlanError {
    /// Machine-readable kind, stable across releases
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::Validation { .. } => "VALIDATION_ERROR",
            PlanError::InfeasibleTimeline { .. } => "INFEASIBLE_TIMELINE",
            PlanError::ScheduleOverconstrained { .. } => "SCHEDULE_OVERCONSTRAINED",
            PlanError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::Serialization(err.to_string())
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.user_message())
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn join_disciplines(disciplines: &[Discipline]) -> String {
    disciplines
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
