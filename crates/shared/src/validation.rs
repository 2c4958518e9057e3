//! Common validation utilities.

use chrono::NaiveTime;
use validator::ValidationError;

lazy_static::lazy_static! {
    /// Guard codes look like `G-2024-045`.
    pub static ref GUARD_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^G-\d{4}-\d{3}$").unwrap();

    /// Wall-clock times are `HH:MM`, 24-hour.
    static ref WALL_CLOCK_REGEX: regex::Regex =
        regex::Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();
}

/// Validates that a latitude value is within valid range (-90 to 90).
pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        let mut err = ValidationError::new("latitude_range");
        err.message = Some("Latitude must be between -90 and 90".into());
        Err(err)
    }
}

/// Validates that a longitude value is within valid range (-180 to 180).
pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        let mut err = ValidationError::new("longitude_range");
        err.message = Some("Longitude must be between -180 and 180".into());
        Err(err)
    }
}

/// Validates the human-readable guard code format `G-<year>-<3 digits>`.
pub fn validate_guard_code(code: &str) -> Result<(), ValidationError> {
    if GUARD_CODE_REGEX.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("guard_code_format");
        err.message = Some("Guard ID must look like G-2024-001".into());
        Err(err)
    }
}

/// Validates an `HH:MM` wall-clock time.
pub fn validate_wall_clock(value: &str) -> Result<(), ValidationError> {
    if parse_wall_clock(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("wall_clock_format");
        err.message = Some("Time must be in HH:MM format".into());
        Err(err)
    }
}

/// Parses an `HH:MM` wall-clock time.
pub fn parse_wall_clock(value: &str) -> Option<NaiveTime> {
    if !WALL_CLOCK_REGEX.is_match(value) {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Formats a time as `HH:MM`.
pub fn format_wall_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Validates that a performance score lies in [0, 100].
pub fn validate_performance(score: f64) -> Result<(), ValidationError> {
    if (0.0..=100.0).contains(&score) {
        Ok(())
    } else {
        let mut err = ValidationError::new("performance_range");
        err.message = Some("Performance must be between 0 and 100".into());
        Err(err)
    }
}
