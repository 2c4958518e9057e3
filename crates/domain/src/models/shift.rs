//! Shift template domain models.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;

/// Serde adapter for `HH:MM` wall-clock times.
pub mod wall_clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&shared::validation::format_wall_clock(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        shared::validation::parse_wall_clock(&s)
            .ok_or_else(|| serde::de::Error::custom("time must be in HH:MM format"))
    }
}

/// A reusable shift template, e.g. "Night" 22:00 to 06:00.
///
/// An end time at or before the start time means the shift ends on the next day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: i64,
    pub name: String,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

/// Shift projection embedded in schedule responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSummary {
    pub id: i64,
    pub name: String,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
}

impl From<&Shift> for ShiftSummary {
    fn from(shift: &Shift) -> Self {
        Self {
            id: shift.id,
            name: shift.name.clone(),
            start_time: shift.start_time,
            end_time: shift.end_time,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewShift {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Default)]
pub struct ShiftPatch {
    pub name: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Request payload for creating a shift. Times are `HH:MM`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_wall_clock"))]
    pub start_time: String,

    #[validate(custom(function = "shared::validation::validate_wall_clock"))]
    pub end_time: String,
}

impl CreateShiftRequest {
    /// Parses the wall-clock times. Call after `validate()`.
    pub fn into_new_shift(self) -> Result<NewShift, DomainError> {
        let start_time = parse_time(&self.start_time)?;
        let end_time = parse_time(&self.end_time)?;
        check_shift_times(start_time, end_time)?;

        Ok(NewShift {
            name: self.name,
            start_time,
            end_time,
        })
    }
}

/// Request payload for updating a shift.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: Option<String>,

    #[validate(custom(function = "shared::validation::validate_wall_clock"))]
    pub start_time: Option<String>,

    #[validate(custom(function = "shared::validation::validate_wall_clock"))]
    pub end_time: Option<String>,
}

impl UpdateShiftRequest {
    pub fn into_patch(self) -> Result<ShiftPatch, DomainError> {
        Ok(ShiftPatch {
            name: self.name,
            start_time: self.start_time.as_deref().map(parse_time).transpose()?,
            end_time: self.end_time.as_deref().map(parse_time).transpose()?,
        })
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, DomainError> {
    shared::validation::parse_wall_clock(value)
        .ok_or_else(|| DomainError::validation("Time must be in HH:MM format"))
}

/// A shift must have a non-empty window.
pub fn check_shift_times(start: NaiveTime, end: NaiveTime) -> Result<(), DomainError> {
    if start == end {
        return Err(DomainError::validation(
            "Shift start and end time must differ",
        ));
    }
    Ok(())
}
