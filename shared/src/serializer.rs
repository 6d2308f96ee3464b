//! Plan serialization
//!
//! Projects a [`TrainingPlan`] into the JSON shapes the dashboard consumes.
//! Output only contains ordered maps, so the same plan always serializes to
//! the same bytes.

use crate::errors::PlanError;
use crate::models::Weekday;
use crate::plan::TrainingPlan;
use crate::schedule::SessionSlot;
use crate::types::{
    PhaseDetail, PhaseSummary, PlanDetails, QuestionnaireResponse, TemplateDetail,
    TrainingPlanPayload,
};
use std::collections::BTreeMap;

pub const PLAN_TYPE_PERSONALIZED: &str = "personalized";
pub const PLAN_TYPE_ABBREVIATED: &str = "abbreviated";

pub const PLAN_GENERATED_MESSAGE: &str = "Training plan generated successfully";

/// "1 week", "12 weeks"
pub fn duration_label(weeks: u32) -> String {
    if weeks == 1 {
        "1 week".to_string()
    } else {
        format!("{} weeks", weeks)
    }
}

/// Dashboard payload for a plan
pub fn to_wire(plan: &TrainingPlan) -> TrainingPlanPayload {
    let plan_type = if plan.abbreviated {
        PLAN_TYPE_ABBREVIATED
    } else {
        PLAN_TYPE_PERSONALIZED
    };

    // The athlete starts with the first week of the first phase
    let weekly_schedule = plan
        .phases
        .first()
        .and_then(|phase| phase.templates.first())
        .map(|template| template.slots.clone())
        .unwrap_or_else(rest_week);

    TrainingPlanPayload {
        id: plan.id.to_string(),
        user_id: plan.user_id.clone(),
        plan_type: plan_type.to_string(),
        duration: duration_label(plan.total_weeks()),
        weekly_hours: plan.declared_hours.clone(),
        phases: plan
            .phases
            .iter()
            .map(|phase| PhaseSummary {
                name: phase.name.display_name().to_string(),
                weeks: phase.weeks,
                focus: phase.focus().to_string(),
            })
            .collect(),
        weekly_schedule,
    }
}

/// Full phase breakdown for the response envelope
pub fn to_details(plan: &TrainingPlan) -> PlanDetails {
    PlanDetails {
        created_on: plan.created_on,
        race_date: plan.goal.race_date,
        race_distance: plan.goal.distance,
        total_weeks: plan.total_weeks(),
        reference_weekly_hours: plan.reference_weekly_hours,
        abbreviated: plan.abbreviated,
        flags: plan.flags.iter().map(|f| f.to_string()).collect(),
        phases: plan
            .phases
            .iter()
            .map(|phase| PhaseDetail {
                name: phase.name.display_name().to_string(),
                weeks: phase.weeks,
                focus: phase.focus().to_string(),
                weekly_hours: phase.weekly_hours,
                templates: phase
                    .templates
                    .iter()
                    .map(|t| TemplateDetail {
                        weeks: t.weeks,
                        variant: t.variant,
                        training_minutes: t.training_minutes(),
                        schedule: t.slots.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// The success envelope returned for a questionnaire submission
pub fn to_response(plan: &TrainingPlan) -> QuestionnaireResponse {
    QuestionnaireResponse {
        success: true,
        training_plan: to_wire(plan),
        plan_details: to_details(plan),
        warnings: plan.warnings.clone(),
        message: PLAN_GENERATED_MESSAGE.to_string(),
    }
}

/// Serialize the dashboard payload
pub fn to_json(plan: &TrainingPlan) -> Result<String, PlanError> {
    Ok(serde_json::to_string(&to_wire(plan))?)
}

fn rest_week() -> BTreeMap<Weekday, SessionSlot> {
    Weekday::ALL.iter().map(|d| (*d, SessionSlot::rest())).collect()
}
