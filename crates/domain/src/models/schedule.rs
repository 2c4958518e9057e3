//! Schedule domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::guard::GuardSummary;
use super::location::LocationSummary;
use super::shift::ShiftSummary;
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Scheduled,
    Completed,
    Missed,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Scheduled => "scheduled",
            ScheduleStatus::Completed => "completed",
            ScheduleStatus::Missed => "missed",
            ScheduleStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled schedules take no part in overlap checks.
    pub fn occupies_guard(&self) -> bool {
        !matches!(self, ScheduleStatus::Cancelled)
    }
}

impl FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(ScheduleStatus::Scheduled),
            "completed" => Ok(ScheduleStatus::Completed),
            "missed" => Ok(ScheduleStatus::Missed),
            "cancelled" => Ok(ScheduleStatus::Cancelled),
            _ => Err(format!("Unknown schedule status: {}", s)),
        }
    }
}

/// Assignment of a guard to a shift at a location on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: i64,
    pub guard_id: i64,
    pub location_id: i64,
    pub shift_id: i64,
    pub date: NaiveDate,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Schedule enriched with its guard, location and shift. A missing join is `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub guard: Option<GuardSummary>,
    pub location: Option<LocationSummary>,
    pub shift: Option<ShiftSummary>,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub guard_id: i64,
    pub location_id: i64,
    pub shift_id: i64,
    pub date: NaiveDate,
    pub status: ScheduleStatus,
}

#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    pub guard_id: Option<i64>,
    pub location_id: Option<i64>,
    pub shift_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<ScheduleStatus>,
}

impl SchedulePatch {
    /// Applies the patch to a copy of `schedule`.
    pub fn apply_to(&self, schedule: &Schedule) -> Schedule {
        let mut merged = schedule.clone();
        if let Some(guard_id) = self.guard_id {
            merged.guard_id = guard_id;
        }
        if let Some(location_id) = self.location_id {
            merged.location_id = location_id;
        }
        if let Some(shift_id) = self.shift_id {
            merged.shift_id = shift_id;
        }
        if let Some(date) = self.date {
            merged.date = date;
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        merged
    }
}

/// Request payload for creating a schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub guard_id: i64,
    pub location_id: i64,
    pub shift_id: i64,
    pub date: NaiveDate,
    pub status: Option<ScheduleStatus>,
}

impl From<CreateScheduleRequest> for NewSchedule {
    fn from(request: CreateScheduleRequest) -> Self {
        Self {
            guard_id: request.guard_id,
            location_id: request.location_id,
            shift_id: request.shift_id,
            date: request.date,
            status: request.status.unwrap_or_default(),
        }
    }
}

/// Request payload for updating a schedule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub guard_id: Option<i64>,
    pub location_id: Option<i64>,
    pub shift_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub status: Option<ScheduleStatus>,
}

impl From<UpdateScheduleRequest> for SchedulePatch {
    fn from(request: UpdateScheduleRequest) -> Self {
        Self {
            guard_id: request.guard_id,
            location_id: request.location_id,
            shift_id: request.shift_id,
            date: request.date,
            status: request.status,
        }
    }
}

/// Query parameters for listing schedules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub guard_id: Option<i64>,
}

/// The supported ways of selecting schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleFilter {
    Date(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
    Guard(i64),
}

impl ScheduleQuery {
    /// Resolves the query into exactly one filter mode.
    pub fn into_filter(self) -> Result<ScheduleFilter, DomainError> {
        let has_range = self.start_date.is_some() || self.end_date.is_some();
        let modes = [self.date.is_some(), has_range, self.guard_id.is_some()]
            .iter()
            .filter(|m| **m)
            .count();

        if modes != 1 {
            return Err(DomainError::validation(
                "Provide exactly one of: date, startDate and endDate, or guardId",
            ));
        }

        if let Some(date) = self.date {
            return Ok(ScheduleFilter::Date(date));
        }

        if let Some(guard_id) = self.guard_id {
            return Ok(ScheduleFilter::Guard(guard_id));
        }

        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Ok(ScheduleFilter::Range { start, end }),
            (Some(_), Some(_)) => Err(DomainError::validation(
                "startDate must not be after endDate",
            )),
            _ => Err(DomainError::validation(
                "Both startDate and endDate are required for a range query",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_query_by_date() {
        let query = ScheduleQuery {
            date: Some(date(2024, 3, 1)),
            ..Default::default()
        };
        assert_eq!(
            query.into_filter().unwrap(),
            ScheduleFilter::Date(date(2024, 3, 1))
        );
    }

    #[test]
    fn test_query_by_range() {
        let query = ScheduleQuery {
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 7)),
            ..Default::default()
        };
        assert_eq!(
            query.into_filter().unwrap(),
            ScheduleFilter::Range {
                start: date(2024, 3, 1),
                end: date(2024, 3, 7)
            }
        );
    }

    #[test]
    fn test_query_by_guard() {
        let query = ScheduleQuery {
            guard_id: Some(9),
            ..Default::default()
        };
        assert_eq!(query.into_filter().unwrap(), ScheduleFilter::Guard(9));
    }

    #[test]
    fn test_query_requires_a_mode() {
        assert!(matches!(
            ScheduleQuery::default().into_filter(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_query_rejects_partial_or_inverted_range() {
        let partial = ScheduleQuery {
            start_date: Some(date(2024, 3, 1)),
            ..Default::default()
        };
        assert!(partial.into_filter().is_err());

        let inverted = ScheduleQuery {
            start_date: Some(date(2024, 3, 7)),
            end_date: Some(date(2024, 3, 1)),
            ..Default::default()
        };
        assert!(inverted.into_filter().is_err());
    }

    #[test]
    fn test_query_rejects_multiple_modes() {
        let query = ScheduleQuery {
            date: Some(date(2024, 3, 1)),
            guard_id: Some(1),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }

    #[test]
    fn test_query_deserializes_camel_case() {
        let query: ScheduleQuery =
            serde_json::from_str(r#"{"startDate":"2024-03-01","endDate":"2024-03-02"}"#).unwrap();
        assert!(query.start_date.is_some());
        assert!(query.end_date.is_some());
    }

    #[test]
    fn test_patch_apply_to() {
        let now = Utc::now();
        let schedule = Schedule {
            id: 1,
            guard_id: 1,
            location_id: 1,
            shift_id: 1,
            date: date(2024, 3, 1),
            status: ScheduleStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        let patch = SchedulePatch {
            shift_id: Some(3),
            status: Some(ScheduleStatus::Cancelled),
            ..Default::default()
        };
        let merged = patch.apply_to(&schedule);
        assert_eq!(merged.shift_id, 3);
        assert_eq!(merged.status, ScheduleStatus::Cancelled);
        assert_eq!(merged.date, schedule.date);
        assert!(!merged.status.occupies_guard());
    }
}
