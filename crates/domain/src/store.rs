//! Storage abstractions.
//!
//! [`WorkforceStore`] is implemented by the persistence crate for PostgreSQL and
//! in memory. Methods that must be atomic (composite guard creation, schedule
//! writes with their overlap check, incident creation with photos) are single
//! trait methods so each implementation can run them in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::models::attendance::{Attendance, AttendanceFilter, AttendancePatch, NewAttendance};
use crate::models::client::{Client, ClientPatch, NewClient};
use crate::models::dashboard::{DashboardCounts, LocationFacts, StaffFacts, UpcomingShiftFacts};
use crate::models::guard::{Guard, GuardPatch, NewGuard};
use crate::models::incident::{
    Incident, IncidentCategory, IncidentFilter, IncidentPatch, IncidentPhoto, NewIncident,
    NewIncidentCategory,
};
use crate::models::location::{Location, LocationPatch, NewLocation};
use crate::models::role::{Role, RoleName};
use crate::models::schedule::{NewSchedule, Schedule, ScheduleFilter, SchedulePatch};
use crate::models::shift::{NewShift, Shift, ShiftPatch};
use crate::models::user::{NewUser, User, UserPatch};

/// Errors reported by store implementations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// A unique constraint was violated on the named field.
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    /// A referenced row does not exist.
    #[error("{0} not found")]
    MissingReference(String),

    /// The guard already has a schedule overlapping the requested window.
    #[error("Schedule overlaps existing schedule {0}")]
    ScheduleConflict(i64),

    /// The row changed in a way that forbids the write.
    #[error("{0}")]
    Conflict(String),

    /// The row being updated does not exist.
    #[error("{0} not found")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait WorkforceStore: Send + Sync {
    /// Cheap liveness probe of the backend.
    async fn ping(&self) -> StoreResult<()>;

    // Roles
    async fn list_roles(&self) -> StoreResult<Vec<Role>>;
    async fn find_role(&self, id: i64) -> StoreResult<Option<Role>>;
    async fn find_role_by_name(&self, name: RoleName) -> StoreResult<Option<Role>>;

    // Users
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: i64, patch: UserPatch) -> StoreResult<User>;
    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> StoreResult<()>;

    // Guards
    /// Inserts the user account and its guard profile atomically.
    async fn insert_guard_with_user(
        &self,
        user: NewUser,
        guard: NewGuard,
    ) -> StoreResult<(User, Guard)>;
    async fn find_guard(&self, id: i64) -> StoreResult<Option<Guard>>;
    async fn find_guard_by_user(&self, user_id: i64) -> StoreResult<Option<Guard>>;
    async fn list_guards(&self) -> StoreResult<Vec<Guard>>;
    async fn update_guard(&self, id: i64, patch: GuardPatch) -> StoreResult<Guard>;

    // Clients
    async fn insert_client(&self, client: NewClient) -> StoreResult<Client>;
    async fn find_client(&self, id: i64) -> StoreResult<Option<Client>>;
    async fn list_clients(&self) -> StoreResult<Vec<Client>>;
    async fn update_client(&self, id: i64, patch: ClientPatch) -> StoreResult<Client>;

    // Locations
    async fn insert_location(&self, location: NewLocation) -> StoreResult<Location>;
    async fn find_location(&self, id: i64) -> StoreResult<Option<Location>>;
    async fn list_locations(&self, client_id: Option<i64>) -> StoreResult<Vec<Location>>;
    async fn update_location(&self, id: i64, patch: LocationPatch) -> StoreResult<Location>;

    // Shifts
    async fn insert_shift(&self, shift: NewShift) -> StoreResult<Shift>;
    async fn find_shift(&self, id: i64) -> StoreResult<Option<Shift>>;
    async fn list_shifts(&self) -> StoreResult<Vec<Shift>>;
    async fn update_shift(&self, id: i64, patch: ShiftPatch) -> StoreResult<Shift>;

    // Schedules
    /// Inserts a schedule unless it overlaps another non-cancelled schedule of
    /// the same guard, in which case `ScheduleConflict` names the colliding one.
    async fn insert_schedule(&self, schedule: NewSchedule) -> StoreResult<Schedule>;
    async fn find_schedule(&self, id: i64) -> StoreResult<Option<Schedule>>;
    async fn list_schedules(&self, filter: ScheduleFilter) -> StoreResult<Vec<Schedule>>;
    /// Applies the patch, re-checking overlap (excluding the schedule itself)
    /// when the result is not cancelled.
    async fn update_schedule(&self, id: i64, patch: SchedulePatch) -> StoreResult<Schedule>;

    // Attendance
    async fn insert_attendance(&self, attendance: NewAttendance) -> StoreResult<Attendance>;
    async fn find_attendance(&self, id: i64) -> StoreResult<Option<Attendance>>;
    async fn list_attendance(&self, filter: AttendanceFilter) -> StoreResult<Vec<Attendance>>;
    async fn update_attendance(&self, id: i64, patch: AttendancePatch)
        -> StoreResult<Attendance>;

    // Incident categories
    async fn insert_incident_category(
        &self,
        category: NewIncidentCategory,
    ) -> StoreResult<IncidentCategory>;
    async fn find_incident_category(&self, id: i64) -> StoreResult<Option<IncidentCategory>>;
    async fn list_incident_categories(&self) -> StoreResult<Vec<IncidentCategory>>;

    // Incidents
    /// Inserts the incident and one photo row per URL atomically.
    async fn insert_incident_with_photos(
        &self,
        incident: NewIncident,
        photo_urls: Vec<String>,
    ) -> StoreResult<(Incident, Vec<IncidentPhoto>)>;
    async fn find_incident(&self, id: i64) -> StoreResult<Option<Incident>>;
    /// Newest first.
    async fn list_incidents(&self, filter: IncidentFilter) -> StoreResult<Vec<Incident>>;
    async fn update_incident(&self, id: i64, patch: IncidentPatch) -> StoreResult<Incident>;
    async fn list_incident_photos(&self, incident_id: i64) -> StoreResult<Vec<IncidentPhoto>>;

    // Dashboard
    async fn dashboard_counts(&self) -> StoreResult<DashboardCounts>;
    /// Guards ordered by id; guards without a user row are skipped.
    async fn staff_facts(&self, limit: i64) -> StoreResult<Vec<StaffFacts>>;
    /// Non-cancelled, fully joined schedules dated `from..=to`, ordered by date
    /// then shift start.
    async fn upcoming_shift_facts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: i64,
    ) -> StoreResult<Vec<UpcomingShiftFacts>>;
    /// Active locations with coordinates, ordered by id.
    async fn location_facts(&self, today: NaiveDate, limit: i64)
        -> StoreResult<Vec<LocationFacts>>;
    /// Most recently created incidents.
    async fn recent_incidents(&self, limit: i64) -> StoreResult<Vec<Incident>>;
}

/// Result of storing one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Public URL of the file.
    pub url: String,
    /// False when identical content was already stored under the same name.
    pub newly_written: bool,
}

/// Storage for uploaded incident photos.
///
/// Names are content-addressed, so one file may back photos of several
/// incidents. Callers only remove files they newly wrote.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Stores the bytes under `name` unless that name already exists.
    async fn store(&self, name: &str, bytes: &[u8]) -> StoreResult<StoredPhoto>;

    /// Removes a previously stored photo by its public URL.
    async fn remove(&self, url: &str) -> StoreResult<()>;
}
