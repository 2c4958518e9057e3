//! Row mappings for the dashboard aggregate queries.

use chrono::{NaiveDate, NaiveTime};
use domain::models::dashboard::{
    DashboardCounts, LocationFacts, PersonName, StaffFacts, UpcomingShiftFacts,
};
use sqlx::FromRow;

use super::guard::GuardEntity;

#[derive(Debug, Clone, FromRow)]
pub struct DashboardCountsRow {
    pub total_guards: i64,
    pub active_clients: i64,
    pub open_incidents: i64,
    pub attendance_total: i64,
    pub attendance_on_time: i64,
}

impl From<DashboardCountsRow> for DashboardCounts {
    fn from(row: DashboardCountsRow) -> Self {
        Self {
            total_guards: row.total_guards,
            active_clients: row.active_clients,
            open_incidents: row.open_incidents,
            attendance_total: row.attendance_total,
            attendance_on_time: row.attendance_on_time,
        }
    }
}

/// A guard row plus its user's name and per-guard counters.
#[derive(Debug, Clone, FromRow)]
pub struct StaffFactsRow {
    #[sqlx(flatten)]
    pub guard: GuardEntity,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub last_location: Option<String>,
    pub attendance_total: i64,
    pub attendance_on_time: i64,
    pub incidents_reported: i64,
}

impl From<StaffFactsRow> for StaffFacts {
    fn from(row: StaffFactsRow) -> Self {
        Self {
            guard: row.guard.into(),
            name: PersonName {
                first_name: row.first_name,
                last_name: row.last_name,
                username: row.username,
            },
            last_location: row.last_location,
            attendance_total: row.attendance_total,
            attendance_on_time: row.attendance_on_time,
            incidents_reported: row.incidents_reported,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UpcomingShiftRow {
    pub schedule_id: i64,
    pub date: NaiveDate,
    pub location_name: String,
    pub shift_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
}

impl From<UpcomingShiftRow> for UpcomingShiftFacts {
    fn from(row: UpcomingShiftRow) -> Self {
        Self {
            schedule_id: row.schedule_id,
            date: row.date,
            location_name: row.location_name,
            shift_name: row.shift_name,
            start_time: row.start_time,
            end_time: row.end_time,
            guard: PersonName {
                first_name: row.first_name,
                last_name: row.last_name,
                username: row.username,
            },
        }
    }
}

/// One active, geocoded location with today's status flags. The guard name
/// columns are null when nobody is scheduled there today.
#[derive(Debug, Clone, FromRow)]
pub struct LocationFactsRow {
    pub location_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub has_unresolved_incident: bool,
    pub has_late_check_in: bool,
    pub guard_first_name: Option<String>,
    pub guard_last_name: Option<String>,
    pub guard_username: Option<String>,
}

impl From<LocationFactsRow> for LocationFacts {
    fn from(row: LocationFactsRow) -> Self {
        let guard_on_site = row.guard_username.map(|username| PersonName {
            first_name: row.guard_first_name,
            last_name: row.guard_last_name,
            username,
        });

        Self {
            location_id: row.location_id,
            name: row.name,
            latitude: row.latitude,
            longitude: row.longitude,
            has_unresolved_incident: row.has_unresolved_incident,
            has_late_check_in: row.has_late_check_in,
            guard_on_site,
        }
    }
}
