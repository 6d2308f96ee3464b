//! Input validation functions
//!
//! Field-level parsers for questionnaire values. Each returns the parsed
//! value or a short message suitable for a [`ValidationError`].
//! Request bodies with fixed shapes use the `validator` crate derive instead
//! (see `types`).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Upper bound for a single discipline's weekly hours
pub const MAX_DISCIPLINE_HOURS: f64 = 40.0;

static TARGET_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):([0-5]\d)(?::([0-5]\d))?$").expect("target time pattern is valid")
});

/// Parse the athlete's age in whole years
pub fn parse_age(value: &str) -> Result<u32, String> {
    let age: i64 = value
        .trim()
        .parse()
        .map_err(|_| "must be a whole number".to_string())?;
    if age <= 0 {
        return Err("must be a positive whole number".to_string());
    }
    if age > 120 {
        return Err("must be at most 120".to_string());
    }
    Ok(age as u32)
}

/// Parse a strictly positive measurement such as weight or height
pub fn parse_positive_number(value: &str) -> Result<f64, String> {
    let number: f64 = value
        .trim()
        .parse()
        .map_err(|_| "must be a number".to_string())?;
    if number.is_nan() || number.is_infinite() {
        return Err("must be a valid number".to_string());
    }
    if number <= 0.0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(number)
}

/// Parse weekly hours for one discipline; an empty field means zero
pub fn parse_weekly_hours(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let hours: f64 = trimmed
        .parse()
        .map_err(|_| "must be a number".to_string())?;
    if hours.is_nan() || hours.is_infinite() {
        return Err("must be a valid number".to_string());
    }
    if hours < 0.0 {
        return Err("cannot be negative".to_string());
    }
    if hours > MAX_DISCIPLINE_HOURS {
        return Err(format!("cannot exceed {} hours", MAX_DISCIPLINE_HOURS));
    }
    Ok(hours)
}

/// Parse the race date and require it to be strictly after `today`
pub fn parse_race_date(value: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| "must be a date in YYYY-MM-DD format".to_string())?;
    if date <= today {
        return Err("must be after today".to_string());
    }
    Ok(date)
}

/// Parse a target finish time (`h:mm:ss` or `h:mm`) into seconds
pub fn parse_target_time(value: &str) -> Result<u32, String> {
    let caps = TARGET_TIME_RE
        .captures(value.trim())
        .ok_or_else(|| "must look like 2:30:00".to_string())?;
    let field = |i: usize| -> u32 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let seconds = field(1) * 3600 + field(2) * 60 + field(3);
    if seconds == 0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(seconds)
}

/// Validate duration in minutes
pub fn validate_duration_minutes(minutes: i64) -> Result<(), String> {
    if minutes < 0 {
        return Err("Duration cannot be negative".to_string());
    }
    if minutes > 1440 {
        // 24 hours
        return Err("Duration cannot exceed 24 hours".to_string());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map questionnaire field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "age" => "Age",
        "weight" => "Weight",
        "height" => "Height",
        "gender" => "Gender",
        "experienceLevel" => "Experience Level",
        "previousRaces" => "Previous Races",
        "currentTrainingHours" => "Current Weekly Training Hours",
        "primaryGoal" => "Primary Goal",
        "targetRace" => "Target Race",
        "raceDate" => "Race Date",
        "targetTime" => "Target Finish Time",
        "swimLevel" => "Swim Level",
        "bikeLevel" => "Bike Level",
        "runLevel" => "Run Level",
        "weeklySwimHours" => "Weekly Swim Hours",
        "weeklyBikeHours" => "Weekly Bike Hours",
        "weeklyRunHours" => "Weekly Run Hours",
        "trainingDays" => "Training Days",
        "preferredTrainingTime" => "Preferred Training Time",
        "equipment" => "Equipment",
        "type" => "Session Type",
        "intensity" => "Intensity",
        "duration" => "Duration",
        "date" => "Date",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

/// Flatten `validator` derive errors into field errors, sorted by field name
pub fn from_validation_errors(errors: &validator::ValidationErrors) -> Vec<ValidationError> {
    let mut out: Vec<ValidationError> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "is invalid".to_string());
            ValidationError::new(&field, &message)
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[rstest]
    #[case("30", Ok(30))]
    #[case(" 45 ", Ok(45))]
    #[case("0", Err(()))]
    #[case("-5", Err(()))]
    #[case("abc", Err(()))]
    #[case("30.5", Err(()))]
    #[case("121", Err(()))]
    fn test_parse_age(#[case] input: &str, #[case] expected: Result<u32, ()>) {
        assert_eq!(parse_age(input).map_err(|_| ()), expected);
    }

    #[test]
    fn test_parse_positive_number() {
        assert_eq!(parse_positive_number("72.5").unwrap(), 72.5);
        assert!(parse_positive_number("0").is_err());
        assert!(parse_positive_number("-1").is_err());
        assert!(parse_positive_number("").is_err());
        assert!(parse_positive_number("NaN").is_err());
        assert!(parse_positive_number("inf").is_err());
    }

    #[test]
    fn test_parse_weekly_hours() {
        assert_eq!(parse_weekly_hours("").unwrap(), 0.0);
        assert_eq!(parse_weekly_hours("0").unwrap(), 0.0);
        assert_eq!(parse_weekly_hours("3.5").unwrap(), 3.5);
        assert!(parse_weekly_hours("-1").is_err());
        assert!(parse_weekly_hours("41").is_err());
        assert!(parse_weekly_hours("two").is_err());
    }

    #[test]
    fn test_parse_race_date() {
        assert_eq!(
            parse_race_date("2025-06-01", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_race_date("2025-03-01", today()).is_err()); // today
        assert!(parse_race_date("2025-02-01", today()).is_err()); // past
        assert!(parse_race_date("06/01/2025", today()).is_err());
        assert!(parse_race_date("", today()).is_err());
    }

    #[rstest]
    #[case("2:30:00", Some(9000))]
    #[case("2:30", Some(9000))]
    #[case("12:05:30", Some(43530))]
    #[case("0:00:00", None)]
    #[case("2:75:00", None)]
    #[case("fast", None)]
    fn test_parse_target_time(#[case] input: &str, #[case] expected: Option<u32>) {
        assert_eq!(parse_target_time(input).ok(), expected);
    }

    #[test]
    fn test_validate_duration_minutes() {
        assert!(validate_duration_minutes(0).is_ok());
        assert!(validate_duration_minutes(90).is_ok());
        assert!(validate_duration_minutes(-1).is_err());
        assert!(validate_duration_minutes(1441).is_err());
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("raceDate"), "Race Date");
        assert_eq!(get_field_display_label("weeklySwimHours"), "Weekly Swim Hours");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::new("swimLevel", "must be one of: beginner");
        assert_eq!(err.display_label, "Swim Level");
        assert_eq!(err.user_message(), "Swim Level: must be one of: beginner");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["displayLabel"], "Swim Level");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_age_range(age in 1u32..=120) {
            prop_assert_eq!(parse_age(&age.to_string()), Ok(age));
        }

        #[test]
        fn prop_valid_weekly_hours(hours in 0.0f64..=40.0) {
            prop_assert!(parse_weekly_hours(&hours.to_string()).is_ok());
        }

        #[test]
        fn prop_future_dates_accepted(days in 1i64..2000) {
            let date = today() + chrono::Duration::days(days);
            let formatted = date.format("%Y-%m-%d").to_string();
            prop_assert_eq!(parse_race_date(&formatted, today()), Ok(date));
        }
    }
}
