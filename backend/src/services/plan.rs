//! Training plan service
//!
//! Runs the plan pipeline for a questionnaire submission:
//! - Intake normalization
//! - Periodization and weekly synthesis
//! - Serialization into the dashboard envelope

use crate::error::ApiError;
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use triflow_shared::{
    generate_plan, normalize, serializer, PlanRequest, PlannerPolicy, QuestionnaireResponse,
    QuestionnaireSubmission,
};
use uuid::Uuid;

/// Plan service for business logic
pub struct PlanService;

impl PlanService {
    /// Generate a plan for a submission received on `today`
    pub fn generate(
        submission: &QuestionnaireSubmission,
        policy: &PlannerPolicy,
        today: NaiveDate,
    ) -> Result<QuestionnaireResponse, ApiError> {
        let intake = normalize(submission, today).map_err(|err| {
            debug!(error = %err, "Questionnaire rejected");
            err
        })?;

        let request = PlanRequest::new(Uuid::new_v4(), today);
        let plan = generate_plan(&intake, &request, policy)?;

        for warning in &plan.warnings {
            warn!(
                plan_id = %plan.id,
                code = %warning.code,
                "{}", warning.message
            );
        }

        info!(
            plan_id = %plan.id,
            user_id = %plan.user_id,
            race_distance = ?plan.goal.distance,
            total_weeks = plan.total_weeks(),
            reference_hours = plan.reference_weekly_hours,
            flags = plan.flags.len(),
            "Training plan generated"
        );

        Ok(serializer::to_response(&plan))
    }
}
