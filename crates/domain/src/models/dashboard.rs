//! Dashboard read models.
//!
//! `*Facts` structs are raw rows gathered by the store; the public views are
//! derived from them in [`crate::services::aggregation`].

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::guard::Guard;
use super::incident::{IncidentPriority, IncidentStatus};
use super::shift::wall_clock;
use super::user::full_name;

/// Name parts of the user behind a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
}

impl PersonName {
    pub fn display(&self) -> String {
        full_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }
}

/// Headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardCounts {
    pub total_guards: i64,
    pub active_clients: i64,
    pub open_incidents: i64,
    pub attendance_total: i64,
    pub attendance_on_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_guards: i64,
    pub active_clients: i64,
    /// Incidents still in the `open` state.
    pub pending_reports: i64,
    /// Percentage of attendance rows marked on time.
    pub attendance_rate: f64,
}

/// Per-guard inputs for the performance table.
#[derive(Debug, Clone)]
pub struct StaffFacts {
    pub guard: Guard,
    pub name: PersonName,
    pub last_location: Option<String>,
    pub attendance_total: i64,
    pub attendance_on_time: i64,
    pub incidents_reported: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffPerformance {
    pub id: i64,
    pub name: String,
    pub guard_id: String,
    pub position: String,
    pub location: Option<String>,
    pub attendance_rate: f64,
    pub incidents_reported: i64,
    pub performance: f64,
}

/// A fully joined upcoming schedule row.
#[derive(Debug, Clone)]
pub struct UpcomingShiftFacts {
    pub schedule_id: i64,
    pub date: NaiveDate,
    pub location_name: String,
    pub shift_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub guard: PersonName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingShift {
    pub schedule_id: i64,
    pub date: NaiveDate,
    pub location: String,
    pub shift: String,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(with = "wall_clock")]
    pub end_time: NaiveTime,
    pub guard_name: String,
}

/// Derived state of a site on the deployment map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardLocationStatus {
    OnDuty,
    LateCheckIn,
    IncidentReported,
}

/// Per-location inputs for the deployment map.
#[derive(Debug, Clone)]
pub struct LocationFacts {
    pub location_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub has_unresolved_incident: bool,
    pub has_late_check_in: bool,
    pub guard_on_site: Option<PersonName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSnapshot {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: GuardLocationStatus,
    pub guard_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Incident,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    pub status: IncidentStatus,
    pub priority: IncidentPriority,
    pub time: DateTime<Utc>,
    pub time_ago: String,
}

/// Query parameters shared by the list-style dashboard endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub limit: Option<i64>,
}
