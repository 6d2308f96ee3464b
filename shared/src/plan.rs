//! Plan assembly
//!
//! Runs periodization and weekly synthesis over a normalized intake and
//! produces an immutable [`TrainingPlan`].

use crate::errors::PlanError;
use crate::intake::Intake;
use crate::models::{AthleteProfile, Discipline, RaceGoal, Weekday};
use crate::periodization::{allocate_phases, PhaseName};
use crate::policy::PlannerPolicy;
use crate::schedule::{synthesize_week, SessionSlot, WeekRequest, WeekVariant};
use crate::types::PlanWarning;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// One week pattern, repeated for `weeks` consecutive weeks of a phase
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyTemplate {
    pub weeks: u32,
    pub variant: WeekVariant,
    pub slots: BTreeMap<Weekday, SessionSlot>,
    pub equipment_constrained: Vec<Discipline>,
    pub unscheduled: Vec<Discipline>,
}

impl WeeklyTemplate {
    pub fn training_minutes(&self) -> u32 {
        self.slots.values().map(|s| s.duration_minutes).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub name: PhaseName,
    pub weeks: u32,
    /// Weekly hour budget for the phase
    pub weekly_hours: f64,
    pub templates: Vec<WeeklyTemplate>,
}

impl Phase {
    pub fn focus(&self) -> &'static str {
        self.name.focus()
    }
}

/// Marker attached to a plan when it departs from the nominal shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlanFlag {
    Abbreviated,
    HoursAdjusted,
    EquipmentConstrained(Discipline),
}

impl fmt::Display for PlanFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanFlag::Abbreviated => write!(f, "abbreviated"),
            PlanFlag::HoursAdjusted => write!(f, "hours-adjusted"),
            PlanFlag::EquipmentConstrained(d) => write!(f, "equipment-constrained:{}", d),
        }
    }
}

/// A generated training plan
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPlan {
    pub id: Uuid,
    pub user_id: String,
    pub created_on: NaiveDate,
    pub goal: RaceGoal,
    /// Declared weekly hours as submitted
    pub declared_hours: String,
    pub reference_weekly_hours: f64,
    pub phases: Vec<Phase>,
    pub flags: Vec<PlanFlag>,
    pub warnings: Vec<PlanWarning>,
    pub abbreviated: bool,
}

impl TrainingPlan {
    pub fn total_weeks(&self) -> u32 {
        self.phases.iter().map(|p| p.weeks).sum()
    }
}

/// Identity and clock for a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanRequest {
    pub plan_id: Uuid,
    pub today: NaiveDate,
}

impl PlanRequest {
    pub fn new(plan_id: Uuid, today: NaiveDate) -> Self {
        Self { plan_id, today }
    }

    /// Request for a plan that is never stored, such as a browser preview
    pub fn preview(today: NaiveDate) -> Self {
        Self {
            plan_id: Uuid::nil(),
            today,
        }
    }
}

/// Weekly hours used to scale phase volume, and whether the discipline
/// hours had to be pulled back into the declared band.
pub fn reference_weekly_hours(profile: &AthleteProfile, policy: &PlannerPolicy) -> (f64, bool) {
    let band = &profile.declared_hours;
    let reported = profile.discipline_hours();
    if reported <= 0.0 {
        return (band.midpoint(), false);
    }

    let low = (band.min_hours - policy.hours_tolerance).max(0.0);
    let high = band
        .max_hours
        .map(|max| max + policy.hours_tolerance)
        .unwrap_or(f64::INFINITY);
    let clamped = reported.clamp(low, high);
    (clamped, clamped != reported)
}

/// Relative discipline weights: the athlete's own hours, or the race
/// distance default when nothing was reported
pub fn discipline_split(intake: &Intake) -> Vec<(Discipline, f64)> {
    if intake.profile.discipline_hours() > 0.0 {
        Discipline::ALL
            .iter()
            .map(|d| (*d, intake.profile.discipline(*d).weekly_hours))
            .collect()
    } else {
        intake.goal.distance.default_split().to_vec()
    }
}

fn week_variants(name: PhaseName, weeks: u32) -> Vec<(WeekVariant, u32)> {
    match name {
        PhaseName::PeakTaper if weeks > 1 => {
            vec![(WeekVariant::Sharpen, weeks - 1), (WeekVariant::Taper, 1)]
        }
        PhaseName::PeakTaper => vec![(WeekVariant::Taper, weeks)],
        _ => vec![(WeekVariant::Standard, weeks)],
    }
}

/// Generate a plan from a normalized intake.
///
/// Deterministic for a given intake, request and policy. Overconstrained
/// weeks are reported as warnings on the plan rather than as errors.
pub fn generate_plan(
    intake: &Intake,
    request: &PlanRequest,
    policy: &PlannerPolicy,
) -> Result<TrainingPlan, PlanError> {
    let periodization = allocate_phases(request.today, intake.goal.race_date, policy)?;
    let (reference_hours, hours_adjusted) = reference_weekly_hours(&intake.profile, policy);
    let split = discipline_split(intake);

    let mut phases = Vec::with_capacity(periodization.phases.len());
    for allocation in &periodization.phases {
        let weekly_hours = reference_hours * allocation.name.volume_factor(policy);
        let templates = week_variants(allocation.name, allocation.weeks)
            .into_iter()
            .map(|(variant, weeks)| {
                let outcome = synthesize_week(&WeekRequest {
                    phase: allocation.name,
                    variant,
                    budget_hours: weekly_hours,
                    split: &split,
                    available_days: &intake.profile.available_days,
                    equipment: &intake.profile.equipment,
                    distance: intake.goal.distance,
                    target_session_minutes: policy.target_session_minutes,
                });
                WeeklyTemplate {
                    weeks,
                    variant,
                    slots: outcome.slots,
                    equipment_constrained: outcome.equipment_constrained,
                    unscheduled: outcome.unscheduled,
                }
            })
            .collect();

        phases.push(Phase {
            name: allocation.name,
            weeks: allocation.weeks,
            weekly_hours,
            templates,
        });
    }

    let mut flags = Vec::new();
    if periodization.abbreviated {
        flags.push(PlanFlag::Abbreviated);
    }
    if hours_adjusted {
        flags.push(PlanFlag::HoursAdjusted);
    }
    let templates = || phases.iter().flat_map(|p| p.templates.iter());
    for template in templates() {
        for d in &template.equipment_constrained {
            let flag = PlanFlag::EquipmentConstrained(*d);
            if !flags.contains(&flag) {
                flags.push(flag);
            }
        }
    }

    let mut warnings: Vec<PlanWarning> = Vec::new();
    for template in templates() {
        if template.unscheduled.is_empty()
            || warnings.iter().any(|w| w.disciplines == template.unscheduled)
        {
            continue;
        }
        let err = PlanError::ScheduleOverconstrained {
            disciplines: template.unscheduled.clone(),
        };
        warnings.push(PlanWarning {
            code: err.code().to_string(),
            message: err.to_string(),
            disciplines: template.unscheduled.clone(),
        });
    }

    Ok(TrainingPlan {
        id: request.plan_id,
        user_id: intake.user_id.clone(),
        created_on: request.today,
        goal: intake.goal.clone(),
        declared_hours: intake.profile.declared_hours.label.clone(),
        reference_weekly_hours: reference_hours,
        phases,
        flags,
        warnings,
        abbreviated: periodization.abbreviated,
    })
}
