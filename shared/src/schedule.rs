//! Weekly schedule synthesis
//!
//! Builds one week of sessions for a phase: splits the phase's hour budget
//! across disciplines, sizes and counts sessions, assigns intensities under
//! the phase caps and places sessions on the athlete's available days.
//!
//! Every synthesized week maps all seven weekdays. Days without training hold
//! an explicit rest slot, so a week always contains at least one rest day.

use crate::errors::PlanError;
use crate::models::{Discipline, Equipment, Intensity, RaceDistance, SessionType, Weekday};
use crate::periodization::PhaseName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// At most this many training days per week; the seventh is always rest
pub const MAX_TRAINING_DAYS: usize = 6;

const ROUNDING_MINUTES: f64 = 5.0;

/// A single day's assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSlot {
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub intensity: Intensity,
}

impl SessionSlot {
    pub fn rest() -> Self {
        Self {
            session_type: SessionType::Rest,
            duration_minutes: 0,
            intensity: Intensity::Recovery,
        }
    }

    pub fn is_training(&self) -> bool {
        self.session_type != SessionType::Rest
    }
}

/// Which kind of week within a phase is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekVariant {
    /// Regular week for the phase
    Standard,
    /// Peak/Taper week before the final one; one hard session per discipline
    Sharpen,
    /// Final week before the race, all easy
    Taper,
}

/// Inputs for one week
#[derive(Debug, Clone)]
pub struct WeekRequest<'a> {
    pub phase: PhaseName,
    pub variant: WeekVariant,
    /// Total training hours for the week
    pub budget_hours: f64,
    /// Relative weight of each discipline (any scale)
    pub split: &'a [(Discipline, f64)],
    pub available_days: &'a BTreeSet<Weekday>,
    pub equipment: &'a BTreeSet<Equipment>,
    pub distance: RaceDistance,
    pub target_session_minutes: u32,
}

/// A synthesized week
#[derive(Debug, Clone, PartialEq)]
pub struct WeekOutcome {
    pub slots: BTreeMap<Weekday, SessionSlot>,
    /// Disciplines whose share moved elsewhere for lack of equipment
    pub equipment_constrained: Vec<Discipline>,
    /// Disciplines left out because there were not enough training days
    pub unscheduled: Vec<Discipline>,
}

impl WeekOutcome {
    /// Number of days holding a training session
    pub fn training_days(&self) -> usize {
        self.slots.values().filter(|s| s.is_training()).count()
    }

    /// The overconstrained report for this week, if any discipline was dropped
    pub fn overconstrained(&self) -> Option<PlanError> {
        (!self.unscheduled.is_empty()).then(|| PlanError::ScheduleOverconstrained {
            disciplines: self.unscheduled.clone(),
        })
    }
}

/// Normalized discipline shares after removing disciplines the athlete has
/// no equipment for. Returns the shares (summing to 1, canonical order) and
/// the constrained disciplines.
pub fn discipline_shares(
    split: &[(Discipline, f64)],
    equipment: &BTreeSet<Equipment>,
) -> (Vec<(Discipline, f64)>, Vec<Discipline>) {
    let weight_of = |d: Discipline| -> f64 {
        split
            .iter()
            .filter(|(sd, w)| *sd == d && w.is_finite() && *w > 0.0)
            .map(|(_, w)| *w)
            .sum()
    };

    let mut constrained = Vec::new();
    let mut kept = Vec::new();
    for d in Discipline::ALL {
        let weight = weight_of(d);
        if !d.is_trainable_with(equipment) {
            if weight > 0.0 {
                constrained.push(d);
            }
            continue;
        }
        if weight > 0.0 {
            kept.push((d, weight));
        }
    }

    // Nothing trainable carried weight: spread evenly over what is trainable
    if kept.is_empty() && !constrained.is_empty() {
        kept = Discipline::ALL
            .iter()
            .filter(|d| d.is_trainable_with(equipment))
            .map(|d| (*d, 1.0))
            .collect();
    }

    let total: f64 = kept.iter().map(|(_, w)| w).sum();
    let shares = if total > 0.0 {
        kept.into_iter().map(|(d, w)| (d, w / total)).collect()
    } else {
        Vec::new()
    };
    (shares, constrained)
}

/// Hard sessions allowed, in order: highs first, then one moderate when at
/// least two sessions remain, then easy.
fn intensity_pattern(phase: PhaseName, variant: WeekVariant, count: usize) -> Vec<Intensity> {
    if variant == WeekVariant::Taper {
        return vec![Intensity::Easy; count];
    }
    let highs = match (phase, variant) {
        (PhaseName::Base, _) => usize::from(count >= 3),
        (PhaseName::Build, WeekVariant::Standard) => 2.min((count + 1) / 2),
        _ => 1.min(count),
    };
    let mut pattern = vec![Intensity::High; highs];
    let remaining = count - highs;
    if remaining >= 2 {
        pattern.push(Intensity::Moderate);
        pattern.extend(std::iter::repeat(Intensity::Easy).take(remaining - 1));
    } else {
        pattern.extend(std::iter::repeat(Intensity::Easy).take(remaining));
    }
    pattern
}

fn round_minutes(minutes: f64) -> u32 {
    ((minutes / ROUNDING_MINUTES).round() * ROUNDING_MINUTES).max(ROUNDING_MINUTES) as u32
}

/// Synthesize one week
pub fn synthesize_week(request: &WeekRequest<'_>) -> WeekOutcome {
    let (shares, equipment_constrained) = discipline_shares(request.split, request.equipment);
    let budget_minutes = (request.budget_hours.max(0.0) * 60.0).round();
    let slots_available = request.available_days.len().min(MAX_TRAINING_DAYS);

    let mut active: Vec<(Discipline, f64)> = if budget_minutes > 0.0 {
        shares
            .iter()
            .filter(|(_, share)| *share > 0.0)
            .map(|(d, share)| (*d, share * budget_minutes))
            .collect()
    } else {
        Vec::new()
    };

    // Not enough days for every discipline: keep the largest shares
    let mut unscheduled = Vec::new();
    if active.len() > slots_available {
        let mut ranked = active.clone();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        let dropped: Vec<(Discipline, f64)> = ranked.split_off(slots_available);
        let dropped_minutes: f64 = dropped.iter().map(|(_, m)| m).sum();
        unscheduled = dropped.iter().map(|(d, _)| *d).collect();
        unscheduled.sort();

        let kept_minutes: f64 = ranked.iter().map(|(_, m)| m).sum();
        active = ranked
            .into_iter()
            .map(|(d, m)| (d, m + dropped_minutes * m / kept_minutes))
            .collect();
        active.sort_by(|a, b| a.0.cmp(&b.0));
    }

    let sessions = build_sessions(request, &active, budget_minutes, slots_available);
    let slots = place_sessions(request.available_days, sessions);

    WeekOutcome {
        slots,
        equipment_constrained,
        unscheduled,
    }
}

/// Decide session counts, durations and intensities, ordered for placement
fn build_sessions(
    request: &WeekRequest<'_>,
    active: &[(Discipline, f64)],
    budget_minutes: f64,
    slots_available: usize,
) -> Vec<SessionSlot> {
    if active.is_empty() {
        return Vec::new();
    }

    let target = f64::from(request.target_session_minutes.max(1));
    let wanted = (budget_minutes / target).round() as usize;
    let total_sessions = slots_available.min(wanted.max(active.len()));

    // One session each, then highest minutes-per-session gets the next one
    let mut counts = vec![1usize; active.len()];
    for _ in active.len()..total_sessions {
        let mut best = 0;
        let mut best_avg = f64::MIN;
        for (i, (_, minutes)) in active.iter().enumerate() {
            let avg = minutes / (counts[i] + 1) as f64;
            if avg > best_avg {
                best = i;
                best_avg = avg;
            }
        }
        counts[best] += 1;
    }

    let mut per_discipline: Vec<(Discipline, Vec<SessionSlot>)> = active
        .iter()
        .zip(&counts)
        .map(|((d, minutes), &count)| {
            let duration = round_minutes(minutes / count as f64);
            let slots = intensity_pattern(request.phase, request.variant, count)
                .into_iter()
                .map(|intensity| SessionSlot {
                    session_type: d.session_type(),
                    duration_minutes: duration,
                    intensity,
                })
                .collect();
            (*d, slots)
        })
        .collect();

    let brick = take_brick(request, &mut per_discipline);

    // Round-robin across disciplines so one discipline is not stacked
    let mut ordered = Vec::with_capacity(total_sessions);
    let rounds = per_discipline.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    for round in 0..rounds {
        for (_, slots) in &per_discipline {
            if let Some(slot) = slots.get(round) {
                ordered.push(*slot);
            }
        }
    }
    ordered.extend(brick);
    ordered
}

/// In Build weeks for Olympic and longer, merge the last bike and last run
/// sessions into a brick when each discipline has at least two sessions.
fn take_brick(
    request: &WeekRequest<'_>,
    per_discipline: &mut [(Discipline, Vec<SessionSlot>)],
) -> Option<SessionSlot> {
    if request.phase != PhaseName::Build
        || request.variant != WeekVariant::Standard
        || request.distance < RaceDistance::Olympic
    {
        return None;
    }
    let has_two = |d: Discipline, list: &[(Discipline, Vec<SessionSlot>)]| {
        list.iter().any(|(ld, s)| *ld == d && s.len() >= 2)
    };
    if !has_two(Discipline::Bike, per_discipline) || !has_two(Discipline::Run, per_discipline) {
        return None;
    }

    let mut minutes = 0;
    for (d, slots) in per_discipline.iter_mut() {
        if matches!(d, Discipline::Bike | Discipline::Run) {
            if let Some(slot) = slots.pop() {
                minutes += slot.duration_minutes;
            }
        }
    }
    Some(SessionSlot {
        session_type: SessionType::Brick,
        duration_minutes: minutes,
        intensity: Intensity::Moderate,
    })
}

/// Spread sessions evenly over the available days; everything else rests
fn place_sessions(
    available_days: &BTreeSet<Weekday>,
    sessions: Vec<SessionSlot>,
) -> BTreeMap<Weekday, SessionSlot> {
    let mut slots: BTreeMap<Weekday, SessionSlot> =
        Weekday::ALL.iter().map(|d| (*d, SessionSlot::rest())).collect();

    let days: Vec<Weekday> = available_days.iter().copied().collect();
    let n = sessions.len().min(days.len());
    for (i, session) in sessions.into_iter().take(n).enumerate() {
        let day = days[i * days.len() / n];
        slots.insert(day, session);
    }
    slots
}
