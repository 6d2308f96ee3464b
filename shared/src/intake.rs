//! Intake normalization
//!
//! Turns a raw questionnaire submission (form strings) into a typed
//! [`AthleteProfile`] and [`RaceGoal`]. Every field is checked and all
//! failures are reported together.

use crate::errors::PlanError;
use crate::models::{
    AthleteProfile, DisciplineProfile, Equipment, ExperienceLevel, Gender, PreviousRace,
    PrimaryGoal, RaceDistance, RaceGoal, SkillLevel, TrainingHoursBand, TrainingTime, Weekday,
};
use crate::types::QuestionnaireSubmission;
use crate::validation::{
    parse_age, parse_positive_number, parse_race_date, parse_target_time, parse_weekly_hours,
    ValidationError,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::str::FromStr;

/// User id assigned when the submission carries none
pub const GUEST_USER_ID: &str = "guest";

/// Normalized questionnaire
#[derive(Debug, Clone, PartialEq)]
pub struct Intake {
    pub user_id: String,
    pub profile: AthleteProfile,
    pub goal: RaceGoal,
}

/// Validate and canonicalize a questionnaire submission.
///
/// Pure: `today` is the submission date against which the race date is
/// checked.
pub fn normalize(
    submission: &QuestionnaireSubmission,
    today: NaiveDate,
) -> Result<Intake, PlanError> {
    let mut errors = Vec::new();
    let s = submission;

    let age = check(&mut errors, "age", required(&s.age).and_then(parse_age));
    let weight = check(
        &mut errors,
        "weight",
        required(&s.weight).and_then(parse_positive_number),
    );
    let height = check(
        &mut errors,
        "height",
        required(&s.height).and_then(parse_positive_number),
    );
    let gender = check(&mut errors, "gender", optional::<Gender>(&s.gender));
    let experience = check(
        &mut errors,
        "experienceLevel",
        required(&s.experience_level).and_then(ExperienceLevel::from_str),
    );
    let previous_races = check(
        &mut errors,
        "previousRaces",
        parse_set::<PreviousRace>(&s.previous_races),
    );
    let declared_hours = check(
        &mut errors,
        "currentTrainingHours",
        required(&s.current_training_hours).and_then(TrainingHoursBand::from_str),
    );
    let primary_goal = check(
        &mut errors,
        "primaryGoal",
        optional::<PrimaryGoal>(&s.primary_goal),
    );
    let distance = check(
        &mut errors,
        "targetRace",
        required(&s.target_race).and_then(RaceDistance::from_str),
    );
    let race_date = check(
        &mut errors,
        "raceDate",
        required(&s.race_date).and_then(|v| parse_race_date(v, today)),
    );
    let target_time = check(
        &mut errors,
        "targetTime",
        non_empty(&s.target_time).map(parse_target_time).transpose(),
    );
    let swim_level = check(
        &mut errors,
        "swimLevel",
        required(&s.swim_level).and_then(SkillLevel::from_str),
    );
    let bike_level = check(
        &mut errors,
        "bikeLevel",
        required(&s.bike_level).and_then(SkillLevel::from_str),
    );
    let run_level = check(
        &mut errors,
        "runLevel",
        required(&s.run_level).and_then(SkillLevel::from_str),
    );
    let swim_hours = check(
        &mut errors,
        "weeklySwimHours",
        parse_weekly_hours(&s.weekly_swim_hours),
    );
    let bike_hours = check(
        &mut errors,
        "weeklyBikeHours",
        parse_weekly_hours(&s.weekly_bike_hours),
    );
    let run_hours = check(
        &mut errors,
        "weeklyRunHours",
        parse_weekly_hours(&s.weekly_run_hours),
    );
    let training_days = check(
        &mut errors,
        "trainingDays",
        parse_set::<Weekday>(&s.training_days),
    );
    let preferred_time = check(
        &mut errors,
        "preferredTrainingTime",
        optional::<TrainingTime>(&s.preferred_training_time),
    );
    let equipment = check(&mut errors, "equipment", parse_set::<Equipment>(&s.equipment));

    if !errors.is_empty() {
        return Err(PlanError::Validation { errors });
    }

    let (
        Some(age),
        Some(weight_kg),
        Some(height_cm),
        Some(gender),
        Some(experience_level),
        Some(previous_races),
        Some(declared_hours),
        Some(primary_goal),
        Some(distance),
        Some(race_date),
        Some(target_time_secs),
        Some(swim_level),
        Some(bike_level),
        Some(run_level),
        Some(swim_hours),
        Some(bike_hours),
        Some(run_hours),
        Some(available_days),
        Some(preferred_time),
        Some(equipment),
    ) = (
        age,
        weight,
        height,
        gender,
        experience,
        previous_races,
        declared_hours,
        primary_goal,
        distance,
        race_date,
        target_time,
        swim_level,
        bike_level,
        run_level,
        swim_hours,
        bike_hours,
        run_hours,
        training_days,
        preferred_time,
        equipment,
    )
    else {
        return Err(PlanError::Validation { errors });
    };

    let profile = AthleteProfile {
        age,
        weight_kg,
        height_cm,
        gender,
        experience_level,
        previous_races,
        declared_hours,
        swim: DisciplineProfile {
            level: swim_level,
            weekly_hours: swim_hours,
        },
        bike: DisciplineProfile {
            level: bike_level,
            weekly_hours: bike_hours,
        },
        run: DisciplineProfile {
            level: run_level,
            weekly_hours: run_hours,
        },
        available_days,
        preferred_time,
        equipment,
        limitations: non_empty(&s.limitations).map(str::to_string),
        motivation: non_empty(&s.motivation).map(str::to_string),
        previous_injuries: non_empty(&s.previous_injuries).map(str::to_string),
    };

    let goal = RaceGoal {
        distance,
        race_date,
        target_time_secs,
        primary_goal,
    };

    let user_id = s
        .user_id
        .as_deref()
        .and_then(non_empty)
        .unwrap_or(GUEST_USER_ID)
        .to_string();

    Ok(Intake {
        user_id,
        profile,
        goal,
    })
}

/// Record a field failure and hand back the value when it parsed
fn check<T>(errors: &mut Vec<ValidationError>, field: &str, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.push(ValidationError::new(field, &message));
            None
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn required(value: &str) -> Result<&str, String> {
    non_empty(value).ok_or_else(|| "is required".to_string())
}

/// An optional enum field: blank is `None`, anything else must parse
fn optional<T: FromStr<Err = String>>(value: &str) -> Result<Option<T>, String> {
    non_empty(value).map(T::from_str).transpose()
}

/// A multi-select field; duplicates collapse, unknown members are rejected
fn parse_set<T: FromStr<Err = String> + Ord>(values: &[String]) -> Result<BTreeSet<T>, String> {
    let mut set = BTreeSet::new();
    let mut unknown = Vec::new();
    for value in values {
        let Some(trimmed) = non_empty(value) else {
            continue;
        };
        match trimmed.parse::<T>() {
            Ok(item) => {
                set.insert(item);
            }
            Err(_) => unknown.push(trimmed.to_string()),
        }
    }
    if unknown.is_empty() {
        Ok(set)
    } else {
        Err(format!("unknown value(s): {}", unknown.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Discipline;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn valid_submission() -> QuestionnaireSubmission {
        QuestionnaireSubmission {
            age: "34".to_string(),
            weight: "72.5".to_string(),
            height: "178".to_string(),
            gender: "female".to_string(),
            experience_level: "intermediate".to_string(),
            previous_races: vec!["Sprint".to_string(), "Olympic".to_string()],
            current_training_hours: "7-10".to_string(),
            primary_goal: "improve-time".to_string(),
            target_race: "olympic".to_string(),
            race_date: "2025-05-12".to_string(),
            target_time: "2:30:00".to_string(),
            swim_level: "intermediate".to_string(),
            bike_level: "advanced".to_string(),
            run_level: "intermediate".to_string(),
            weekly_swim_hours: "2".to_string(),
            weekly_bike_hours: "4".to_string(),
            weekly_run_hours: "2.5".to_string(),
            training_days: ["Monday", "Tuesday", "Thursday", "Saturday", "Sunday"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            preferred_training_time: "morning".to_string(),
            equipment: vec!["Pool access".to_string(), "Road bike".to_string()],
            limitations: "  ".to_string(),
            motivation: "Qualify for nationals".to_string(),
            previous_injuries: String::new(),
            user_id: Some("user-456".to_string()),
        }
    }

    #[test]
    fn test_normalize_valid_submission() {
        let intake = normalize(&valid_submission(), today()).unwrap();

        assert_eq!(intake.user_id, "user-456");
        assert_eq!(intake.profile.age, 34);
        assert_eq!(intake.profile.weight_kg, 72.5);
        assert_eq!(intake.profile.experience_level, ExperienceLevel::Intermediate);
        assert_eq!(intake.profile.discipline(Discipline::Run).weekly_hours, 2.5);
        assert_eq!(intake.profile.available_days.len(), 5);
        assert!(intake.profile.equipment.contains(&Equipment::PoolAccess));
        assert_eq!(intake.profile.limitations, None);
        assert_eq!(
            intake.profile.motivation.as_deref(),
            Some("Qualify for nationals")
        );
        assert_eq!(intake.goal.distance, RaceDistance::Olympic);
        assert_eq!(intake.goal.target_time_secs, Some(9000));
        assert_eq!(intake.goal.primary_goal, Some(PrimaryGoal::ImproveTime));
    }

    #[test]
    fn test_reports_every_offending_field() {
        let mut submission = valid_submission();
        submission.age = "-3".to_string();
        submission.weight = "heavy".to_string();
        submission.race_date = "2025-03-03".to_string();
        submission.swim_level = "expert".to_string();
        submission.training_days.push("Caturday".to_string());

        let err = normalize(&submission, today()).unwrap_err();
        let PlanError::Validation { errors } = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["age", "weight", "raceDate", "swimLevel", "trainingDays"]
        );
    }

    #[test]
    fn test_empty_submission_lists_required_fields() {
        let err = normalize(&QuestionnaireSubmission::default(), today()).unwrap_err();
        let PlanError::Validation { errors } = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "age",
                "weight",
                "height",
                "experienceLevel",
                "currentTrainingHours",
                "targetRace",
                "raceDate",
                "swimLevel",
                "bikeLevel",
                "runLevel",
            ]
        );
        assert!(errors.iter().all(|e| e.message == "is required"));
    }

    #[test]
    fn test_optional_fields_may_be_blank() {
        let mut submission = valid_submission();
        submission.gender.clear();
        submission.primary_goal.clear();
        submission.target_time.clear();
        submission.preferred_training_time.clear();
        submission.weekly_swim_hours.clear();
        submission.user_id = None;

        let intake = normalize(&submission, today()).unwrap();
        assert_eq!(intake.profile.gender, None);
        assert_eq!(intake.goal.target_time_secs, None);
        assert_eq!(intake.profile.swim.weekly_hours, 0.0);
        assert_eq!(intake.user_id, GUEST_USER_ID);
    }

    #[test]
    fn test_duplicate_days_collapse() {
        let mut submission = valid_submission();
        submission.training_days = vec![
            "Monday".to_string(),
            "monday".to_string(),
            "Friday".to_string(),
        ];
        let intake = normalize(&submission, today()).unwrap();
        assert_eq!(
            intake.profile.available_days.into_iter().collect::<Vec<_>>(),
            vec![Weekday::Monday, Weekday::Friday]
        );
    }

    #[rstest]
    #[case("gender", "robot")]
    #[case("primaryGoal", "win-everything")]
    #[case("targetTime", "soon")]
    #[case("preferredTrainingTime", "midnight")]
    #[case("currentTrainingHours", "many")]
    #[case("targetRace", "marathon")]
    fn test_rejects_values_outside_closed_sets(#[case] field: &str, #[case] value: &str) {
        let mut submission = valid_submission();
        let slot = match field {
            "gender" => &mut submission.gender,
            "primaryGoal" => &mut submission.primary_goal,
            "targetTime" => &mut submission.target_time,
            "preferredTrainingTime" => &mut submission.preferred_training_time,
            "currentTrainingHours" => &mut submission.current_training_hours,
            "targetRace" => &mut submission.target_race,
            _ => unreachable!(),
        };
        *slot = value.to_string();

        let err = normalize(&submission, today()).unwrap_err();
        let PlanError::Validation { errors } = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, field);
    }

    #[test]
    fn test_unknown_equipment_is_named() {
        let mut submission = valid_submission();
        submission.equipment.push("Jetpack".to_string());
        let err = normalize(&submission, today()).unwrap_err();
        assert!(err.to_string().contains("Jetpack"));
    }
}
