//! PostgreSQL implementation of [`WorkforceStore`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use domain::models::attendance::{Attendance, AttendanceFilter, AttendancePatch, NewAttendance};
use domain::models::client::{Client, ClientPatch, NewClient};
use domain::models::dashboard::{DashboardCounts, LocationFacts, StaffFacts, UpcomingShiftFacts};
use domain::models::guard::{Guard, GuardPatch, NewGuard};
use domain::models::incident::{
    Incident, IncidentCategory, IncidentFilter, IncidentPatch, IncidentPhoto, NewIncident,
    NewIncidentCategory,
};
use domain::models::location::{Location, LocationPatch, NewLocation};
use domain::models::role::{Role, RoleName};
use domain::models::schedule::{NewSchedule, Schedule, ScheduleFilter, SchedulePatch};
use domain::models::shift::{NewShift, Shift, ShiftPatch};
use domain::models::user::{NewUser, User, UserPatch};
use domain::{StoreError, StoreResult, WorkforceStore};
use sqlx::PgPool;

use crate::error::{
    store_error, INCIDENT_STATUS_CHANGED, REASSIGN_WITH_ATTENDANCE, SCHEDULE_OF_OTHER_GUARD,
};
use crate::metrics::record_pool_metrics;
use crate::repositories::{
    AttendanceRepository, ClientRepository, DashboardRepository, GuardRepository,
    IncidentCategoryRepository, IncidentRepository, LocationRepository, RoleRepository,
    ScheduleRepository, ScheduleWrite, ShiftRepository, ShiftWrite, UserRepository,
};

/// Store backed by a PostgreSQL pool. Cloning shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    roles: RoleRepository,
    users: UserRepository,
    guards: GuardRepository,
    clients: ClientRepository,
    locations: LocationRepository,
    shifts: ShiftRepository,
    schedules: ScheduleRepository,
    attendance: AttendanceRepository,
    categories: IncidentCategoryRepository,
    incidents: IncidentRepository,
    dashboard: DashboardRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            roles: RoleRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            guards: GuardRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            locations: LocationRepository::new(pool.clone()),
            shifts: ShiftRepository::new(pool.clone()),
            schedules: ScheduleRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool.clone()),
            categories: IncidentCategoryRepository::new(pool.clone()),
            incidents: IncidentRepository::new(pool.clone()),
            dashboard: DashboardRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn found<T>(row: Option<T>, entity: &str) -> StoreResult<T> {
    row.ok_or_else(|| StoreError::NotFound(entity.to_string()))
}

fn schedule_outcome(outcome: ScheduleWrite) -> StoreResult<Schedule> {
    match outcome {
        ScheduleWrite::Written(row) => Ok(row.into()),
        ScheduleWrite::Conflict(id) => Err(StoreError::ScheduleConflict(id)),
        ScheduleWrite::MissingReference(entity) => {
            Err(StoreError::MissingReference(entity.to_string()))
        }
        ScheduleWrite::NotFound => Err(StoreError::NotFound("Schedule".into())),
        ScheduleWrite::HasAttendance => {
            Err(StoreError::Conflict(REASSIGN_WITH_ATTENDANCE.to_string()))
        }
    }
}

#[async_trait]
impl WorkforceStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        record_pool_metrics(&self.pool);
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_error)
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        let rows = self.roles.list().await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_role(&self, id: i64) -> StoreResult<Option<Role>> {
        let row = self.roles.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_role_by_name(&self, name: RoleName) -> StoreResult<Option<Role>> {
        let row = self.roles.find_by_name(name.into()).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let row = self.users.create(&user).await.map_err(store_error)?;
        Ok(row.into())
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let row = self.users.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = self.users.find_by_username(username).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = self.users.list().await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> StoreResult<User> {
        let row = self.users.update(id, &patch).await.map_err(store_error)?;
        found(row, "User").map(Into::into)
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> StoreResult<()> {
        let touched = self.users.record_login(id, at).await.map_err(store_error)?;
        if touched == 0 {
            return Err(StoreError::NotFound("User".into()));
        }
        Ok(())
    }

    async fn insert_guard_with_user(
        &self,
        user: NewUser,
        guard: NewGuard,
    ) -> StoreResult<(User, Guard)> {
        let (user_row, guard_row) = self
            .guards
            .create_with_user(&user, &guard)
            .await
            .map_err(store_error)?;
        Ok((user_row.into(), guard_row.into()))
    }

    async fn find_guard(&self, id: i64) -> StoreResult<Option<Guard>> {
        let row = self.guards.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_guard_by_user(&self, user_id: i64) -> StoreResult<Option<Guard>> {
        let row = self.guards.find_by_user_id(user_id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_guards(&self) -> StoreResult<Vec<Guard>> {
        let rows = self.guards.list().await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_guard(&self, id: i64, patch: GuardPatch) -> StoreResult<Guard> {
        let row = self.guards.update(id, &patch).await.map_err(store_error)?;
        found(row, "Guard").map(Into::into)
    }

    async fn insert_client(&self, client: NewClient) -> StoreResult<Client> {
        let row = self.clients.create(&client).await.map_err(store_error)?;
        Ok(row.into())
    }

    async fn find_client(&self, id: i64) -> StoreResult<Option<Client>> {
        let row = self.clients.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        let rows = self.clients.list().await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_client(&self, id: i64, patch: ClientPatch) -> StoreResult<Client> {
        let row = self.clients.update(id, &patch).await.map_err(store_error)?;
        found(row, "Client").map(Into::into)
    }

    async fn insert_location(&self, location: NewLocation) -> StoreResult<Location> {
        let row = self.locations.create(&location).await.map_err(store_error)?;
        Ok(row.into())
    }

    async fn find_location(&self, id: i64) -> StoreResult<Option<Location>> {
        let row = self.locations.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_locations(&self, client_id: Option<i64>) -> StoreResult<Vec<Location>> {
        let rows = self.locations.list(client_id).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_location(&self, id: i64, patch: LocationPatch) -> StoreResult<Location> {
        let row = self.locations.update(id, &patch).await.map_err(store_error)?;
        found(row, "Location").map(Into::into)
    }

    async fn insert_shift(&self, shift: NewShift) -> StoreResult<Shift> {
        let row = self.shifts.create(&shift).await.map_err(store_error)?;
        Ok(row.into())
    }

    async fn find_shift(&self, id: i64) -> StoreResult<Option<Shift>> {
        let row = self.shifts.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_shifts(&self) -> StoreResult<Vec<Shift>> {
        let rows = self.shifts.list().await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_shift(&self, id: i64, patch: ShiftPatch) -> StoreResult<Shift> {
        match self.shifts.update_checked(id, &patch).await.map_err(store_error)? {
            ShiftWrite::Written(row) => Ok(row.into()),
            ShiftWrite::Conflict(schedule_id) => Err(StoreError::ScheduleConflict(schedule_id)),
            ShiftWrite::NotFound => Err(StoreError::NotFound("Shift".into())),
        }
    }

    async fn insert_schedule(&self, schedule: NewSchedule) -> StoreResult<Schedule> {
        let outcome = self
            .schedules
            .create_checked(&schedule)
            .await
            .map_err(store_error)?;
        schedule_outcome(outcome)
    }

    async fn find_schedule(&self, id: i64) -> StoreResult<Option<Schedule>> {
        let row = self.schedules.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_schedules(&self, filter: ScheduleFilter) -> StoreResult<Vec<Schedule>> {
        let rows = self.schedules.list(filter).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_schedule(&self, id: i64, patch: SchedulePatch) -> StoreResult<Schedule> {
        let outcome = self
            .schedules
            .update_checked(id, &patch)
            .await
            .map_err(store_error)?;
        schedule_outcome(outcome)
    }

    async fn insert_attendance(&self, attendance: NewAttendance) -> StoreResult<Attendance> {
        let row = self.attendance.create(&attendance).await.map_err(store_error)?;
        row.map(Into::into)
            .ok_or_else(|| StoreError::Conflict(SCHEDULE_OF_OTHER_GUARD.to_string()))
    }

    async fn find_attendance(&self, id: i64) -> StoreResult<Option<Attendance>> {
        let row = self.attendance.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_attendance(&self, filter: AttendanceFilter) -> StoreResult<Vec<Attendance>> {
        let rows = self.attendance.list(filter).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_attendance(
        &self,
        id: i64,
        patch: AttendancePatch,
    ) -> StoreResult<Attendance> {
        let row = self.attendance.update(id, &patch).await.map_err(store_error)?;
        found(row, "Attendance record").map(Into::into)
    }

    async fn insert_incident_category(
        &self,
        category: NewIncidentCategory,
    ) -> StoreResult<IncidentCategory> {
        let row = self.categories.create(&category).await.map_err(store_error)?;
        Ok(row.into())
    }

    async fn find_incident_category(&self, id: i64) -> StoreResult<Option<IncidentCategory>> {
        let row = self.categories.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_incident_categories(&self) -> StoreResult<Vec<IncidentCategory>> {
        let rows = self.categories.list().await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_incident_with_photos(
        &self,
        incident: NewIncident,
        photo_urls: Vec<String>,
    ) -> StoreResult<(Incident, Vec<IncidentPhoto>)> {
        let (row, photos) = self
            .incidents
            .create_with_photos(&incident, &photo_urls)
            .await
            .map_err(store_error)?;
        Ok((row.into(), photos.into_iter().map(Into::into).collect()))
    }

    async fn find_incident(&self, id: i64) -> StoreResult<Option<Incident>> {
        let row = self.incidents.find_by_id(id).await.map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_incidents(&self, filter: IncidentFilter) -> StoreResult<Vec<Incident>> {
        let rows = self.incidents.list(filter).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_incident(&self, id: i64, patch: IncidentPatch) -> StoreResult<Incident> {
        let row = self.incidents.update(id, &patch).await.map_err(store_error)?;
        match row {
            Some(row) => Ok(row.into()),
            None if patch.expected_status.is_some() => {
                let exists = self.incidents.find_by_id(id).await.map_err(store_error)?;
                if exists.is_some() {
                    Err(StoreError::Conflict(INCIDENT_STATUS_CHANGED.to_string()))
                } else {
                    Err(StoreError::NotFound("Incident".into()))
                }
            }
            None => Err(StoreError::NotFound("Incident".into())),
        }
    }

    async fn list_incident_photos(&self, incident_id: i64) -> StoreResult<Vec<IncidentPhoto>> {
        let rows = self.incidents.photos(incident_id).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn dashboard_counts(&self) -> StoreResult<DashboardCounts> {
        let row = self.dashboard.counts().await.map_err(store_error)?;
        Ok(row.into())
    }

    async fn staff_facts(&self, limit: i64) -> StoreResult<Vec<StaffFacts>> {
        let rows = self.dashboard.staff_facts(limit).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn upcoming_shift_facts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: i64,
    ) -> StoreResult<Vec<UpcomingShiftFacts>> {
        let rows = self
            .dashboard
            .upcoming_shifts(from, to, limit)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn location_facts(
        &self,
        today: NaiveDate,
        limit: i64,
    ) -> StoreResult<Vec<LocationFacts>> {
        let rows = self
            .dashboard
            .location_facts(today, limit)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent_incidents(&self, limit: i64) -> StoreResult<Vec<Incident>> {
        let rows = self.incidents.recent(limit).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
