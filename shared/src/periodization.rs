//! Periodization planner
//!
//! Splits the weeks between submission and race day into Base, Build and
//! Peak/Taper phases.

use crate::errors::PlanError;
use crate::policy::PlannerPolicy;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this many weeks a three-phase split is impossible
const THREE_PHASE_MIN_WEEKS: u32 = 3;

/// Macrocycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Base,
    Build,
    PeakTaper,
}

impl PhaseName {
    /// Name shown by the dashboard
    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseName::Base => "Base Building",
            PhaseName::Build => "Build Phase",
            PhaseName::PeakTaper => "Peak & Taper",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            PhaseName::Base => "Aerobic development and technique",
            PhaseName::Build => "Intensity and race-specific training",
            PhaseName::PeakTaper => "Race preparation and recovery",
        }
    }

    /// Weekly volume multiplier applied to the athlete's current hours
    pub fn volume_factor(&self, policy: &PlannerPolicy) -> f64 {
        match self {
            PhaseName::Base => policy.base_volume_factor,
            PhaseName::Build => policy.build_volume_factor,
            PhaseName::PeakTaper => policy.peak_volume_factor,
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Weeks assigned to one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAllocation {
    pub name: PhaseName,
    pub weeks: u32,
}

/// Result of periodization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Periodization {
    pub total_weeks: u32,
    pub phases: Vec<PhaseAllocation>,
    /// Set when the timeline was too short for all three phases
    pub abbreviated: bool,
}

/// Whole weeks from `today` to `race_date`, floored
pub fn weeks_until(today: NaiveDate, race_date: NaiveDate) -> u32 {
    let days = (race_date - today).num_days();
    if days <= 0 {
        0
    } else {
        (days / 7) as u32
    }
}

/// Allocate the macrocycle into phases.
///
/// Each phase gets `floor(ratio * W)` weeks, raised to at least one week;
/// whatever is left over goes to Base.
pub fn allocate_phases(
    today: NaiveDate,
    race_date: NaiveDate,
    policy: &PlannerPolicy,
) -> Result<Periodization, PlanError> {
    let total_weeks = weeks_until(today, race_date);
    let minimum_weeks = policy.min_weeks.max(1);

    if total_weeks < minimum_weeks {
        return Err(PlanError::InfeasibleTimeline {
            weeks_available: total_weeks,
            minimum_weeks,
            earliest_feasible_date: today + Duration::days(7 * i64::from(minimum_weeks)),
        });
    }

    if total_weeks < THREE_PHASE_MIN_WEEKS {
        return Ok(Periodization {
            total_weeks,
            phases: vec![PhaseAllocation {
                name: PhaseName::Base,
                weeks: total_weeks,
            }],
            abbreviated: true,
        });
    }

    let share = |ratio: f64| -> u32 { ((ratio * f64::from(total_weeks)).floor() as u32).max(1) };
    let mut base = share(policy.base_ratio);
    let mut build = share(policy.build_ratio);
    let mut peak = share(policy.peak_ratio);

    let assigned = base + build + peak;
    if assigned <= total_weeks {
        base += total_weeks - assigned;
    } else {
        // Minimum-week bumps overshot; give weeks back, Base first
        let mut excess = assigned - total_weeks;
        for weeks in [&mut base, &mut build, &mut peak] {
            let give = excess.min(weeks.saturating_sub(1));
            *weeks -= give;
            excess -= give;
        }
    }

    Ok(Periodization {
        total_weeks,
        phases: vec![
            PhaseAllocation {
                name: PhaseName::Base,
                weeks: base,
            },
            PhaseAllocation {
                name: PhaseName::Build,
                weeks: build,
            },
            PhaseAllocation {
                name: PhaseName::PeakTaper,
                weeks: peak,
            },
        ],
        abbreviated: false,
    })
}
