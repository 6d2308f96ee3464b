//! Domain models for the TriFlow plan pipeline
//!
//! Closed-set enumerations parse case-insensitively from the values the
//! questionnaire form submits and serialize to the values the UI renders.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Athlete attributes
// ============================================================================

/// Overall triathlon experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

impl ExperienceLevel {
    pub const ALL: &'static [&'static str] = &["beginner", "intermediate", "advanced", "elite"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
            ExperienceLevel::Elite => "elite",
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            "elite" => Ok(ExperienceLevel::Elite),
            _ => Err(format!("Must be one of: {}", Self::ALL.join(", "))),
        }
    }
}

/// Per-discipline skill level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub const ALL: &'static [&'static str] = &["beginner", "intermediate", "advanced"];
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            _ => Err(format!("Must be one of: {}", Self::ALL.join(", "))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "prefer-not-to-say" => Ok(Gender::PreferNotToSay),
            _ => Err("Must be one of: male, female, other, prefer-not-to-say".to_string()),
        }
    }
}

/// Preferred time of day for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingTime {
    EarlyMorning,
    Morning,
    Midday,
    Afternoon,
    Evening,
    Flexible,
}

impl FromStr for TrainingTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "early-morning" => Ok(TrainingTime::EarlyMorning),
            "morning" => Ok(TrainingTime::Morning),
            "midday" => Ok(TrainingTime::Midday),
            "afternoon" => Ok(TrainingTime::Afternoon),
            "evening" => Ok(TrainingTime::Evening),
            "flexible" => Ok(TrainingTime::Flexible),
            _ => Err(
                "Must be one of: early-morning, morning, midday, afternoon, evening, flexible"
                    .to_string(),
            ),
        }
    }
}

/// Race distances already completed by the athlete
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PreviousRace {
    Sprint,
    Olympic,
    HalfIronman,
    FullIronman,
    UltraDistance,
}

impl FromStr for PreviousRace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sprint" => Ok(PreviousRace::Sprint),
            "olympic" => Ok(PreviousRace::Olympic),
            "half ironman" | "half-ironman" => Ok(PreviousRace::HalfIronman),
            "full ironman" | "full-ironman" => Ok(PreviousRace::FullIronman),
            "ultra distance" | "ultra-distance" => Ok(PreviousRace::UltraDistance),
            _ => Err(format!("Unknown race distance: {}", s)),
        }
    }
}

/// Equipment and facility access reported by the athlete
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Equipment {
    PoolAccess,
    OpenWaterAccess,
    RoadBike,
    TriathlonBike,
    IndoorTrainer,
    GymMembership,
    RunningTrack,
    HeartRateMonitor,
    PowerMeter,
}

impl FromStr for Equipment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pool access" => Ok(Equipment::PoolAccess),
            "open water access" => Ok(Equipment::OpenWaterAccess),
            "road bike" => Ok(Equipment::RoadBike),
            "triathlon bike" => Ok(Equipment::TriathlonBike),
            "indoor trainer" => Ok(Equipment::IndoorTrainer),
            "gym membership" => Ok(Equipment::GymMembership),
            "running track" => Ok(Equipment::RunningTrack),
            "heart rate monitor" => Ok(Equipment::HeartRateMonitor),
            "power meter" => Ok(Equipment::PowerMeter),
            _ => Err(format!("Unknown equipment: {}", s)),
        }
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// Day of the week, ordered Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Weekday::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == normalized || d.as_str()[..3] == normalized)
            .ok_or_else(|| format!("Unknown weekday: {}", s))
    }
}

// ============================================================================
// Disciplines and sessions
// ============================================================================

/// A triathlon discipline, in race order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Swim,
    Bike,
    Run,
}

impl Discipline {
    pub const ALL: [Discipline; 3] = [Discipline::Swim, Discipline::Bike, Discipline::Run];

    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Swim => "swim",
            Discipline::Bike => "bike",
            Discipline::Run => "run",
        }
    }

    /// Equipment that makes the discipline trainable; empty means none needed
    pub fn required_equipment(&self) -> &'static [Equipment] {
        match self {
            Discipline::Swim => &[Equipment::PoolAccess, Equipment::OpenWaterAccess],
            Discipline::Bike => &[
                Equipment::RoadBike,
                Equipment::TriathlonBike,
                Equipment::IndoorTrainer,
            ],
            Discipline::Run => &[],
        }
    }

    /// Whether the athlete's equipment allows this discipline to be trained
    pub fn is_trainable_with(&self, equipment: &BTreeSet<Equipment>) -> bool {
        let required = self.required_equipment();
        required.is_empty() || required.iter().any(|e| equipment.contains(e))
    }

    pub fn session_type(&self) -> SessionType {
        match self {
            Discipline::Swim => SessionType::Swim,
            Discipline::Bike => SessionType::Bike,
            Discipline::Run => SessionType::Run,
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a scheduled session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Swim,
    Bike,
    Run,
    Rest,
    Brick,
}

impl SessionType {
    pub const ALL: &'static [&'static str] = &["swim", "bike", "run", "rest", "brick"];
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "swim" => Ok(SessionType::Swim),
            "bike" => Ok(SessionType::Bike),
            "run" => Ok(SessionType::Run),
            "rest" => Ok(SessionType::Rest),
            "brick" => Ok(SessionType::Brick),
            _ => Err(format!("Must be one of: {}", Self::ALL.join(", "))),
        }
    }
}

/// Session intensity as rendered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Easy,
    Moderate,
    High,
    Recovery,
}

impl Intensity {
    pub const ALL: &'static [&'static str] = &["easy", "moderate", "high", "recovery"];
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Intensity::Easy),
            "moderate" => Ok(Intensity::Moderate),
            "high" => Ok(Intensity::High),
            "recovery" => Ok(Intensity::Recovery),
            _ => Err(format!("Must be one of: {}", Self::ALL.join(", "))),
        }
    }
}

// ============================================================================
// Athlete profile and race goal
// ============================================================================

/// Declared weekly training volume from the questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingHoursBand {
    /// Value as submitted, echoed back to the UI
    pub label: String,
    pub min_hours: f64,
    /// `None` for open-ended bands such as "16+"
    pub max_hours: Option<f64>,
}

impl TrainingHoursBand {
    /// Hours used when the athlete reports no per-discipline volume
    pub fn midpoint(&self) -> f64 {
        match self.max_hours {
            Some(max) => (self.min_hours + max) / 2.0,
            None => self.min_hours,
        }
    }
}

impl FromStr for TrainingHoursBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let band = |min: f64, max: Option<f64>| TrainingHoursBand {
            label: label.to_string(),
            min_hours: min,
            max_hours: max,
        };
        match label {
            "0-3" => Ok(band(0.0, Some(3.0))),
            "4-6" => Ok(band(4.0, Some(6.0))),
            "7-10" => Ok(band(7.0, Some(10.0))),
            "11-15" => Ok(band(11.0, Some(15.0))),
            "16+" => Ok(band(16.0, None)),
            other => match other.parse::<f64>() {
                Ok(hours) if hours.is_finite() && hours >= 0.0 => Ok(band(hours, Some(hours))),
                _ => Err("Must be one of: 0-3, 4-6, 7-10, 11-15, 16+ or a number of hours"
                    .to_string()),
            },
        }
    }
}

/// Current level and volume in a single discipline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisciplineProfile {
    pub level: SkillLevel,
    pub weekly_hours: f64,
}

/// Typed athlete profile produced by intake normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: Option<Gender>,
    pub experience_level: ExperienceLevel,
    pub previous_races: BTreeSet<PreviousRace>,
    pub declared_hours: TrainingHoursBand,
    pub swim: DisciplineProfile,
    pub bike: DisciplineProfile,
    pub run: DisciplineProfile,
    pub available_days: BTreeSet<Weekday>,
    pub preferred_time: Option<TrainingTime>,
    pub equipment: BTreeSet<Equipment>,
    /// Advisory only, never parsed
    pub limitations: Option<String>,
    pub motivation: Option<String>,
    pub previous_injuries: Option<String>,
}

impl AthleteProfile {
    pub fn discipline(&self, discipline: Discipline) -> &DisciplineProfile {
        match discipline {
            Discipline::Swim => &self.swim,
            Discipline::Bike => &self.bike,
            Discipline::Run => &self.run,
        }
    }

    /// Sum of the per-discipline weekly hours
    pub fn discipline_hours(&self) -> f64 {
        Discipline::ALL
            .iter()
            .map(|d| self.discipline(*d).weekly_hours)
            .sum()
    }
}

/// Target race distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceDistance {
    Sprint,
    Olympic,
    Half,
    Full,
}

impl RaceDistance {
    /// Swim/bike/run time split used when the athlete reports no volume
    pub fn default_split(&self) -> [(Discipline, f64); 3] {
        match self {
            RaceDistance::Sprint => [
                (Discipline::Swim, 0.25),
                (Discipline::Bike, 0.40),
                (Discipline::Run, 0.35),
            ],
            RaceDistance::Olympic => [
                (Discipline::Swim, 0.20),
                (Discipline::Bike, 0.45),
                (Discipline::Run, 0.35),
            ],
            RaceDistance::Half | RaceDistance::Full => [
                (Discipline::Swim, 0.15),
                (Discipline::Bike, 0.55),
                (Discipline::Run, 0.30),
            ],
        }
    }
}

impl FromStr for RaceDistance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sprint" => Ok(RaceDistance::Sprint),
            "olympic" => Ok(RaceDistance::Olympic),
            "half" | "half-ironman" => Ok(RaceDistance::Half),
            "full" | "full-ironman" => Ok(RaceDistance::Full),
            _ => Err("Must be one of: sprint, olympic, half-ironman, full-ironman".to_string()),
        }
    }
}

/// What the athlete wants out of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryGoal {
    CompleteFirstTri,
    ImproveTime,
    LongerDistance,
    GeneralFitness,
}

impl FromStr for PrimaryGoal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "complete-first-tri" => Ok(PrimaryGoal::CompleteFirstTri),
            "improve-time" => Ok(PrimaryGoal::ImproveTime),
            "longer-distance" => Ok(PrimaryGoal::LongerDistance),
            "general-fitness" => Ok(PrimaryGoal::GeneralFitness),
            _ => Err(
                "Must be one of: complete-first-tri, improve-time, longer-distance, general-fitness"
                    .to_string(),
            ),
        }
    }
}

/// Race the plan builds toward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceGoal {
    pub distance: RaceDistance,
    pub race_date: NaiveDate,
    /// Target finish time in seconds
    pub target_time_secs: Option<u32>,
    pub primary_goal: Option<PrimaryGoal>,
}

// ============================================================================
// Standalone training sessions
// ============================================================================

/// A training session record managed through the session CRUD surface.
/// Independent of any generated plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub title: String,
    pub duration: u32,
    pub intensity: Intensity,
    pub completed: bool,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
