//! Attendance domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    #[serde(alias = "on-time")]
    OnTime,
    Late,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::OnTime => "on_time",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
        }
    }

    /// Late or absent check-ins flag a site on the dashboard map.
    pub fn is_late_check_in(&self) -> bool {
        matches!(self, AttendanceStatus::Late | AttendanceStatus::Absent)
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_time" | "on-time" => Ok(AttendanceStatus::OnTime),
            "late" => Ok(AttendanceStatus::Late),
            "absent" => Ok(AttendanceStatus::Absent),
            _ => Err(format!("Unknown attendance status: {}", s)),
        }
    }
}

/// A guard's check-in record, optionally tied to a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub guard_id: i64,
    pub schedule_id: Option<i64>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub comments: Option<String>,
    pub location_latitude: Option<f64>,
    pub location_longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub guard_id: i64,
    pub schedule_id: Option<i64>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub comments: Option<String>,
    pub location_latitude: Option<f64>,
    pub location_longitude: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct AttendancePatch {
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub status: Option<AttendanceStatus>,
    pub comments: Option<String>,
    pub location_latitude: Option<f64>,
    pub location_longitude: Option<f64>,
}

/// Request payload for recording attendance.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendanceRequest {
    pub guard_id: i64,

    pub schedule_id: Option<i64>,

    pub check_in_time: Option<DateTime<Utc>>,

    pub check_out_time: Option<DateTime<Utc>>,

    pub status: AttendanceStatus,

    #[validate(length(max = 1000, message = "Comments are too long"))]
    pub comments: Option<String>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub location_latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub location_longitude: Option<f64>,
}

impl From<CreateAttendanceRequest> for NewAttendance {
    fn from(request: CreateAttendanceRequest) -> Self {
        Self {
            guard_id: request.guard_id,
            schedule_id: request.schedule_id,
            check_in_time: request.check_in_time,
            check_out_time: request.check_out_time,
            status: request.status,
            comments: request.comments,
            location_latitude: request.location_latitude,
            location_longitude: request.location_longitude,
        }
    }
}

/// Request payload for correcting an attendance record.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub check_in_time: Option<DateTime<Utc>>,

    pub check_out_time: Option<DateTime<Utc>>,

    pub status: Option<AttendanceStatus>,

    #[validate(length(max = 1000, message = "Comments are too long"))]
    pub comments: Option<String>,

    #[validate(custom(function = "shared::validation::validate_latitude"))]
    pub location_latitude: Option<f64>,

    #[validate(custom(function = "shared::validation::validate_longitude"))]
    pub location_longitude: Option<f64>,
}

impl From<UpdateAttendanceRequest> for AttendancePatch {
    fn from(request: UpdateAttendanceRequest) -> Self {
        Self {
            check_in_time: request.check_in_time,
            check_out_time: request.check_out_time,
            status: request.status,
            comments: request.comments,
            location_latitude: request.location_latitude,
            location_longitude: request.location_longitude,
        }
    }
}

/// Query parameters for listing attendance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub guard_id: Option<i64>,
    pub schedule_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceFilter {
    All,
    Guard(i64),
    Schedule(i64),
}

impl From<AttendanceQuery> for AttendanceFilter {
    fn from(query: AttendanceQuery) -> Self {
        match (query.guard_id, query.schedule_id) {
            (Some(guard_id), _) => AttendanceFilter::Guard(guard_id),
            (None, Some(schedule_id)) => AttendanceFilter::Schedule(schedule_id),
            (None, None) => AttendanceFilter::All,
        }
    }
}

/// Check-out must not precede check-in.
pub fn check_attendance_times(
    check_in: Option<DateTime<Utc>>,
    check_out: Option<DateTime<Utc>>,
) -> Result<(), DomainError> {
    match (check_in, check_out) {
        (Some(check_in), Some(check_out)) if check_out < check_in => Err(
            DomainError::validation("Check-out time must not be before check-in time"),
        ),
        _ => Ok(()),
    }
}
