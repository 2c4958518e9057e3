//! In-process implementation of [`WorkforceStore`].
//!
//! All tables live behind one `RwLock`; every write method holds the write
//! lock for its whole duration, which gives the same atomicity as the
//! PostgreSQL transactions. Unique and foreign key rules mirror the schema and
//! report the same field and entity labels.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::attendance::{Attendance, AttendanceFilter, AttendancePatch, NewAttendance};
use domain::models::client::{Client, ClientPatch, ClientStatus, NewClient};
use domain::models::dashboard::{
    DashboardCounts, LocationFacts, PersonName, StaffFacts, UpcomingShiftFacts,
};
use domain::models::guard::{Guard, GuardPatch, NewGuard};
use domain::models::incident::{
    CategoryPriority, Incident, IncidentCategory, IncidentFilter, IncidentPatch, IncidentPhoto,
    IncidentStatus, NewIncident, NewIncidentCategory,
};
use domain::models::location::{Location, LocationPatch, LocationStatus, NewLocation};
use domain::models::role::{Role, RoleName};
use domain::models::schedule::{NewSchedule, Schedule, ScheduleFilter, SchedulePatch};
use domain::models::shift::{NewShift, Shift, ShiftPatch};
use domain::models::user::{NewUser, User, UserPatch};
use domain::models::AttendanceStatus;
use domain::services::{
    find_conflict, neighbouring_dates, retimed_shift_conflict, BookedShift, ScheduledWindow,
    ShiftWindow,
};
use domain::{StoreError, StoreResult, WorkforceStore};
use tokio::sync::RwLock;

use crate::error::{
    referenced_entity, unique_field, INCIDENT_STATUS_CHANGED, REASSIGN_WITH_ATTENDANCE,
    SCHEDULE_OF_OTHER_GUARD,
};

/// Default incident categories, matching the seed migration.
const SEED_CATEGORIES: [(&str, &str, CategoryPriority); 7] = [
    ("Break-in", "Unauthorized entry to premises", CategoryPriority::High),
    ("Suspicious Activity", "Unusual behavior or activity", CategoryPriority::Medium),
    ("Vandalism", "Property damage", CategoryPriority::Medium),
    ("Medical Emergency", "Health-related emergency", CategoryPriority::High),
    ("Fire", "Fire or smoke", CategoryPriority::High),
    ("Theft", "Stolen property", CategoryPriority::Medium),
    ("Maintenance Issue", "Facility maintenance problems", CategoryPriority::Low),
];

/// Standard shift templates, matching the seed migration.
const SEED_SHIFTS: [(&str, (u32, u32), (u32, u32)); 5] = [
    ("Morning", (6, 0), (14, 0)),
    ("Afternoon", (14, 0), (22, 0)),
    ("Night", (22, 0), (6, 0)),
    ("Weekend Day", (8, 0), (20, 0)),
    ("Weekend Night", (20, 0), (8, 0)),
];

#[derive(Default)]
struct Tables {
    sequences: HashMap<&'static str, i64>,
    roles: BTreeMap<i64, Role>,
    users: BTreeMap<i64, User>,
    guards: BTreeMap<i64, Guard>,
    clients: BTreeMap<i64, Client>,
    locations: BTreeMap<i64, Location>,
    shifts: BTreeMap<i64, Shift>,
    schedules: BTreeMap<i64, Schedule>,
    attendance: BTreeMap<i64, Attendance>,
    categories: BTreeMap<i64, IncidentCategory>,
    incidents: BTreeMap<i64, Incident>,
    photos: BTreeMap<i64, IncidentPhoto>,
}

fn duplicate(constraint: &str) -> StoreError {
    StoreError::Duplicate(unique_field(constraint).to_string())
}

fn missing(constraint: &str) -> StoreError {
    StoreError::MissingReference(referenced_entity(constraint).to_string())
}

fn not_found(entity: &str) -> StoreError {
    StoreError::NotFound(entity.to_string())
}

fn take<T>(items: impl Iterator<Item = T>, limit: i64) -> Vec<T> {
    items.take(usize::try_from(limit).unwrap_or(0)).collect()
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let id = self.sequences.entry(table).or_insert(0);
        *id += 1;
        *id
    }

    fn seed(&mut self) {
        let now = Utc::now();

        for (index, name) in RoleName::ALL.into_iter().enumerate() {
            let id = index as i64 + 1;
            self.roles.insert(id, Role { id, name });
        }

        for (name, description, priority) in SEED_CATEGORIES {
            let id = self.next_id("incident_categories");
            self.categories.insert(
                id,
                IncidentCategory {
                    id,
                    name: name.to_string(),
                    description: Some(description.to_string()),
                    priority,
                    created_at: now,
                    updated_at: now,
                },
            );
        }

        for (name, (start_h, start_m), (end_h, end_m)) in SEED_SHIFTS {
            let (Some(start_time), Some(end_time)) = (
                NaiveTime::from_hms_opt(start_h, start_m, 0),
                NaiveTime::from_hms_opt(end_h, end_m, 0),
            ) else {
                continue;
            };
            let id = self.next_id("shifts");
            self.shifts.insert(
                id,
                Shift {
                    id,
                    name: name.to_string(),
                    start_time,
                    end_time,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
    }

    fn check_new_user(&self, user: &NewUser) -> StoreResult<()> {
        if self.users.values().any(|u| u.username == user.username) {
            return Err(duplicate("users_username_key"));
        }
        if !self.roles.contains_key(&user.role_id) {
            return Err(missing("users_role_id_fkey"));
        }
        Ok(())
    }

    fn build_user(&mut self, user: NewUser) -> User {
        let now = Utc::now();
        let id = self.next_id("users");
        User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            role_id: user.role_id,
            active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn check_guard_codes(
        &self,
        guard_code: Option<&str>,
        national_id: Option<&str>,
        exclude_id: Option<i64>,
    ) -> StoreResult<()> {
        let others = self.guards.values().filter(|g| Some(g.id) != exclude_id);
        for other in others {
            if guard_code == Some(other.guard_code.as_str()) {
                return Err(duplicate("guards_guard_code_key"));
            }
            if national_id == Some(other.national_id.as_str()) {
                return Err(duplicate("guards_national_id_key"));
            }
        }
        Ok(())
    }

    /// First non-cancelled schedule of `guard_id` whose window overlaps the
    /// candidate, ignoring `exclude_id`.
    fn schedule_conflict(
        &self,
        guard_id: i64,
        date: NaiveDate,
        shift: &Shift,
        exclude_id: Option<i64>,
    ) -> Option<i64> {
        let dates = neighbouring_dates(date);
        let existing = self
            .schedules
            .values()
            .filter(|s| s.guard_id == guard_id)
            .filter(|s| Some(s.id) != exclude_id)
            .filter(|s| s.status.occupies_guard())
            .filter(|s| dates.contains(&s.date))
            .filter_map(|s| {
                self.shifts
                    .get(&s.shift_id)
                    .map(|sh| ScheduledWindow::new(s.id, s.date, sh.start_time, sh.end_time))
            });

        let candidate = ShiftWindow::new(date, shift.start_time, shift.end_time);
        find_conflict(&candidate, existing)
    }

    /// Validates references and overlap for a schedule about to be written.
    fn check_schedule(&self, schedule: &Schedule, exclude_id: Option<i64>) -> StoreResult<()> {
        if !self.guards.contains_key(&schedule.guard_id) {
            return Err(missing("schedules_guard_id_fkey"));
        }
        let shift = self
            .shifts
            .get(&schedule.shift_id)
            .ok_or_else(|| missing("schedules_shift_id_fkey"))?;

        if schedule.status.occupies_guard() {
            if let Some(id) =
                self.schedule_conflict(schedule.guard_id, schedule.date, shift, exclude_id)
            {
                return Err(StoreError::ScheduleConflict(id));
            }
        }

        if !self.locations.contains_key(&schedule.location_id) {
            return Err(missing("schedules_location_id_fkey"));
        }
        Ok(())
    }

    /// Rejects new template times that would make any guard's committed
    /// schedules overlap.
    fn check_retimed_shift(
        &self,
        shift_id: i64,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> StoreResult<()> {
        let guards: HashSet<i64> = self
            .schedules
            .values()
            .filter(|s| s.shift_id == shift_id && s.status.occupies_guard())
            .map(|s| s.guard_id)
            .collect();
        if guards.is_empty() {
            return Ok(());
        }

        let booked: Vec<BookedShift> = self
            .schedules
            .values()
            .filter(|s| guards.contains(&s.guard_id) && s.status.occupies_guard())
            .filter_map(|s| {
                self.shifts.get(&s.shift_id).map(|shift| BookedShift {
                    schedule_id: s.id,
                    guard_id: s.guard_id,
                    shift_id: s.shift_id,
                    date: s.date,
                    start_time: shift.start_time,
                    end_time: shift.end_time,
                })
            })
            .collect();

        match retimed_shift_conflict(shift_id, start_time, end_time, &booked) {
            Some(id) => Err(StoreError::ScheduleConflict(id)),
            None => Ok(()),
        }
    }

    fn person_name(&self, user_id: i64) -> Option<PersonName> {
        self.users.get(&user_id).map(|u| PersonName {
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            username: u.username.clone(),
        })
    }
}

/// Store holding every table in process memory.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates a store seeded with the fixed roles, default incident
    /// categories and standard shift templates.
    pub fn new() -> Self {
        let mut tables = Tables::default();
        tables.seed();
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkforceStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        Ok(self.tables.read().await.roles.values().cloned().collect())
    }

    async fn find_role(&self, id: i64) -> StoreResult<Option<Role>> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: RoleName) -> StoreResult<Option<Role>> {
        let tables = self.tables.read().await;
        Ok(tables.roles.values().find(|r| r.name == name).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        tables.check_new_user(&user)?;
        let user = tables.build_user(user);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if let Some(role_id) = patch.role_id {
            if !tables.roles.contains_key(&role_id) {
                return Err(missing("users_role_id_fkey"));
            }
        }

        let user = tables.users.get_mut(&id).ok_or_else(|| not_found("User"))?;
        if let Some(hash) = patch.password_hash {
            user.password_hash = hash;
        }
        if patch.first_name.is_some() {
            user.first_name = patch.first_name;
        }
        if patch.last_name.is_some() {
            user.last_name = patch.last_name;
        }
        if patch.email.is_some() {
            user.email = patch.email;
        }
        if patch.phone.is_some() {
            user.phone = patch.phone;
        }
        if let Some(role_id) = patch.role_id {
            user.role_id = role_id;
        }
        if let Some(active) = patch.active {
            user.active = active;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id).ok_or_else(|| not_found("User"))?;
        user.last_login = Some(at);
        Ok(())
    }

    async fn insert_guard_with_user(
        &self,
        user: NewUser,
        guard: NewGuard,
    ) -> StoreResult<(User, Guard)> {
        let mut tables = self.tables.write().await;
        tables.check_new_user(&user)?;
        tables.check_guard_codes(
            Some(guard.guard_code.as_str()),
            Some(guard.national_id.as_str()),
            None,
        )?;

        let user = tables.build_user(user);
        let now = Utc::now();
        let id = tables.next_id("guards");
        let guard = Guard {
            id,
            user_id: user.id,
            guard_code: guard.guard_code,
            national_id: guard.national_id,
            date_of_birth: guard.date_of_birth,
            address: guard.address,
            emergency_contact: guard.emergency_contact,
            join_date: guard.join_date,
            position: guard.position,
            status: guard.status,
            performance: guard.performance,
            created_at: now,
            updated_at: now,
        };

        tables.users.insert(user.id, user.clone());
        tables.guards.insert(guard.id, guard.clone());
        Ok((user, guard))
    }

    async fn find_guard(&self, id: i64) -> StoreResult<Option<Guard>> {
        Ok(self.tables.read().await.guards.get(&id).cloned())
    }

    async fn find_guard_by_user(&self, user_id: i64) -> StoreResult<Option<Guard>> {
        let tables = self.tables.read().await;
        Ok(tables.guards.values().find(|g| g.user_id == user_id).cloned())
    }

    async fn list_guards(&self) -> StoreResult<Vec<Guard>> {
        Ok(self.tables.read().await.guards.values().cloned().collect())
    }

    async fn update_guard(&self, id: i64, patch: GuardPatch) -> StoreResult<Guard> {
        let mut tables = self.tables.write().await;
        if !tables.guards.contains_key(&id) {
            return Err(not_found("Guard"));
        }
        tables.check_guard_codes(
            patch.guard_code.as_deref(),
            patch.national_id.as_deref(),
            Some(id),
        )?;

        let guard = tables.guards.get_mut(&id).ok_or_else(|| not_found("Guard"))?;
        if let Some(code) = patch.guard_code {
            guard.guard_code = code;
        }
        if let Some(national_id) = patch.national_id {
            guard.national_id = national_id;
        }
        if patch.date_of_birth.is_some() {
            guard.date_of_birth = patch.date_of_birth;
        }
        if patch.address.is_some() {
            guard.address = patch.address;
        }
        if patch.emergency_contact.is_some() {
            guard.emergency_contact = patch.emergency_contact;
        }
        if let Some(position) = patch.position {
            guard.position = position;
        }
        if let Some(status) = patch.status {
            guard.status = status;
        }
        if let Some(performance) = patch.performance {
            guard.performance = performance;
        }
        guard.updated_at = Utc::now();
        Ok(guard.clone())
    }

    async fn insert_client(&self, client: NewClient) -> StoreResult<Client> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.next_id("clients");
        let client = Client {
            id,
            name: client.name,
            address: client.address,
            contact_person: client.contact_person,
            contact_phone: client.contact_phone,
            contact_email: client.contact_email,
            contract_start: client.contract_start,
            contract_end: client.contract_end,
            status: client.status,
            created_at: now,
            updated_at: now,
        };
        tables.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn find_client(&self, id: i64) -> StoreResult<Option<Client>> {
        Ok(self.tables.read().await.clients.get(&id).cloned())
    }

    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        Ok(self.tables.read().await.clients.values().cloned().collect())
    }

    async fn update_client(&self, id: i64, patch: ClientPatch) -> StoreResult<Client> {
        let mut tables = self.tables.write().await;
        let client = tables.clients.get_mut(&id).ok_or_else(|| not_found("Client"))?;
        if let Some(name) = patch.name {
            client.name = name;
        }
        if let Some(address) = patch.address {
            client.address = address;
        }
        if let Some(person) = patch.contact_person {
            client.contact_person = person;
        }
        if let Some(phone) = patch.contact_phone {
            client.contact_phone = phone;
        }
        if let Some(email) = patch.contact_email {
            client.contact_email = email;
        }
        if patch.contract_start.is_some() {
            client.contract_start = patch.contract_start;
        }
        if patch.contract_end.is_some() {
            client.contract_end = patch.contract_end;
        }
        if let Some(status) = patch.status {
            client.status = status;
        }
        client.updated_at = Utc::now();
        Ok(client.clone())
    }

    async fn insert_location(&self, location: NewLocation) -> StoreResult<Location> {
        let mut tables = self.tables.write().await;
        if !tables.clients.contains_key(&location.client_id) {
            return Err(missing("locations_client_id_fkey"));
        }
        let now = Utc::now();
        let id = tables.next_id("locations");
        let location = Location {
            id,
            client_id: location.client_id,
            name: location.name,
            address: location.address,
            latitude: location.latitude,
            longitude: location.longitude,
            status: location.status,
            created_at: now,
            updated_at: now,
        };
        tables.locations.insert(id, location.clone());
        Ok(location)
    }

    async fn find_location(&self, id: i64) -> StoreResult<Option<Location>> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn list_locations(&self, client_id: Option<i64>) -> StoreResult<Vec<Location>> {
        let tables = self.tables.read().await;
        Ok(tables
            .locations
            .values()
            .filter(|l| client_id.map_or(true, |c| l.client_id == c))
            .cloned()
            .collect())
    }

    async fn update_location(&self, id: i64, patch: LocationPatch) -> StoreResult<Location> {
        let mut tables = self.tables.write().await;
        if !tables.locations.contains_key(&id) {
            return Err(not_found("Location"));
        }
        if let Some(client_id) = patch.client_id {
            if !tables.clients.contains_key(&client_id) {
                return Err(missing("locations_client_id_fkey"));
            }
        }

        let location = tables.locations.get_mut(&id).ok_or_else(|| not_found("Location"))?;
        if let Some(client_id) = patch.client_id {
            location.client_id = client_id;
        }
        if let Some(name) = patch.name {
            location.name = name;
        }
        if patch.address.is_some() {
            location.address = patch.address;
        }
        if patch.latitude.is_some() {
            location.latitude = patch.latitude;
        }
        if patch.longitude.is_some() {
            location.longitude = patch.longitude;
        }
        if let Some(status) = patch.status {
            location.status = status;
        }
        location.updated_at = Utc::now();
        Ok(location.clone())
    }

    async fn insert_shift(&self, shift: NewShift) -> StoreResult<Shift> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.next_id("shifts");
        let shift = Shift {
            id,
            name: shift.name,
            start_time: shift.start_time,
            end_time: shift.end_time,
            created_at: now,
            updated_at: now,
        };
        tables.shifts.insert(id, shift.clone());
        Ok(shift)
    }

    async fn find_shift(&self, id: i64) -> StoreResult<Option<Shift>> {
        Ok(self.tables.read().await.shifts.get(&id).cloned())
    }

    async fn list_shifts(&self) -> StoreResult<Vec<Shift>> {
        Ok(self.tables.read().await.shifts.values().cloned().collect())
    }

    async fn update_shift(&self, id: i64, patch: ShiftPatch) -> StoreResult<Shift> {
        let mut tables = self.tables.write().await;
        let current = tables.shifts.get(&id).ok_or_else(|| not_found("Shift"))?;
        let start_time = patch.start_time.unwrap_or(current.start_time);
        let end_time = patch.end_time.unwrap_or(current.end_time);
        if (start_time, end_time) != (current.start_time, current.end_time) {
            tables.check_retimed_shift(id, start_time, end_time)?;
        }

        let shift = tables.shifts.get_mut(&id).ok_or_else(|| not_found("Shift"))?;
        if let Some(name) = patch.name {
            shift.name = name;
        }
        if let Some(start) = patch.start_time {
            shift.start_time = start;
        }
        if let Some(end) = patch.end_time {
            shift.end_time = end;
        }
        shift.updated_at = Utc::now();
        Ok(shift.clone())
    }

    async fn insert_schedule(&self, schedule: NewSchedule) -> StoreResult<Schedule> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let candidate = Schedule {
            id: 0,
            guard_id: schedule.guard_id,
            location_id: schedule.location_id,
            shift_id: schedule.shift_id,
            date: schedule.date,
            status: schedule.status,
            created_at: now,
            updated_at: now,
        };
        tables.check_schedule(&candidate, None)?;

        let id = tables.next_id("schedules");
        let schedule = Schedule { id, ..candidate };
        tables.schedules.insert(id, schedule.clone());
        Ok(schedule)
    }

    async fn find_schedule(&self, id: i64) -> StoreResult<Option<Schedule>> {
        Ok(self.tables.read().await.schedules.get(&id).cloned())
    }

    async fn list_schedules(&self, filter: ScheduleFilter) -> StoreResult<Vec<Schedule>> {
        let tables = self.tables.read().await;
        let mut schedules: Vec<Schedule> = tables
            .schedules
            .values()
            .filter(|s| match filter {
                ScheduleFilter::Date(date) => s.date == date,
                ScheduleFilter::Range { start, end } => s.date >= start && s.date <= end,
                ScheduleFilter::Guard(guard_id) => s.guard_id == guard_id,
            })
            .cloned()
            .collect();
        schedules.sort_by_key(|s| (s.date, s.id));
        Ok(schedules)
    }

    async fn update_schedule(&self, id: i64, patch: SchedulePatch) -> StoreResult<Schedule> {
        let mut tables = self.tables.write().await;
        let current = tables.schedules.get(&id).ok_or_else(|| not_found("Schedule"))?;
        let mut merged = patch.apply_to(current);
        if merged.guard_id != current.guard_id
            && tables.attendance.values().any(|a| a.schedule_id == Some(id))
        {
            return Err(StoreError::Conflict(REASSIGN_WITH_ATTENDANCE.to_string()));
        }
        tables.check_schedule(&merged, Some(id))?;

        merged.updated_at = Utc::now();
        tables.schedules.insert(id, merged.clone());
        Ok(merged)
    }

    async fn insert_attendance(&self, attendance: NewAttendance) -> StoreResult<Attendance> {
        let mut tables = self.tables.write().await;
        if !tables.guards.contains_key(&attendance.guard_id) {
            return Err(missing("attendance_guard_id_fkey"));
        }
        if let Some(schedule_id) = attendance.schedule_id {
            let schedule = tables
                .schedules
                .get(&schedule_id)
                .ok_or_else(|| missing("attendance_schedule_id_fkey"))?;
            if schedule.guard_id != attendance.guard_id {
                return Err(StoreError::Conflict(SCHEDULE_OF_OTHER_GUARD.to_string()));
            }
            if tables
                .attendance
                .values()
                .any(|a| a.schedule_id == Some(schedule_id))
            {
                return Err(duplicate("attendance_schedule_id_key"));
            }
        }

        let now = Utc::now();
        let id = tables.next_id("attendance");
        let attendance = Attendance {
            id,
            guard_id: attendance.guard_id,
            schedule_id: attendance.schedule_id,
            check_in_time: attendance.check_in_time,
            check_out_time: attendance.check_out_time,
            status: attendance.status,
            comments: attendance.comments,
            location_latitude: attendance.location_latitude,
            location_longitude: attendance.location_longitude,
            created_at: now,
            updated_at: now,
        };
        tables.attendance.insert(id, attendance.clone());
        Ok(attendance)
    }

    async fn find_attendance(&self, id: i64) -> StoreResult<Option<Attendance>> {
        Ok(self.tables.read().await.attendance.get(&id).cloned())
    }

    async fn list_attendance(&self, filter: AttendanceFilter) -> StoreResult<Vec<Attendance>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attendance
            .values()
            .filter(|a| match filter {
                AttendanceFilter::All => true,
                AttendanceFilter::Guard(guard_id) => a.guard_id == guard_id,
                AttendanceFilter::Schedule(schedule_id) => a.schedule_id == Some(schedule_id),
            })
            .cloned()
            .collect())
    }

    async fn update_attendance(
        &self,
        id: i64,
        patch: AttendancePatch,
    ) -> StoreResult<Attendance> {
        let mut tables = self.tables.write().await;
        let record = tables
            .attendance
            .get_mut(&id)
            .ok_or_else(|| not_found("Attendance record"))?;
        if patch.check_in_time.is_some() {
            record.check_in_time = patch.check_in_time;
        }
        if patch.check_out_time.is_some() {
            record.check_out_time = patch.check_out_time;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        if patch.comments.is_some() {
            record.comments = patch.comments;
        }
        if patch.location_latitude.is_some() {
            record.location_latitude = patch.location_latitude;
        }
        if patch.location_longitude.is_some() {
            record.location_longitude = patch.location_longitude;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn insert_incident_category(
        &self,
        category: NewIncidentCategory,
    ) -> StoreResult<IncidentCategory> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.next_id("incident_categories");
        let category = IncidentCategory {
            id,
            name: category.name,
            description: category.description,
            priority: category.priority,
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn find_incident_category(&self, id: i64) -> StoreResult<Option<IncidentCategory>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn list_incident_categories(&self) -> StoreResult<Vec<IncidentCategory>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn insert_incident_with_photos(
        &self,
        incident: NewIncident,
        photo_urls: Vec<String>,
    ) -> StoreResult<(Incident, Vec<IncidentPhoto>)> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&incident.reported_by) {
            return Err(missing("incidents_reported_by_fkey"));
        }
        if let Some(location_id) = incident.location_id {
            if !tables.locations.contains_key(&location_id) {
                return Err(missing("incidents_location_id_fkey"));
            }
        }
        if let Some(category_id) = incident.category_id {
            if !tables.categories.contains_key(&category_id) {
                return Err(missing("incidents_category_id_fkey"));
            }
        }

        let now = Utc::now();
        let id = tables.next_id("incidents");
        let incident = Incident {
            id,
            reported_by: incident.reported_by,
            location_id: incident.location_id,
            category_id: incident.category_id,
            title: incident.title,
            description: incident.description,
            date: incident.date,
            status: incident.status,
            priority: incident.priority,
            latitude: incident.latitude,
            longitude: incident.longitude,
            created_at: now,
            updated_at: now,
        };

        let mut photos = Vec::with_capacity(photo_urls.len());
        for photo_url in photo_urls {
            let photo_id = tables.next_id("incident_photos");
            photos.push(IncidentPhoto {
                id: photo_id,
                incident_id: id,
                photo_url,
                created_at: now,
            });
        }

        tables.incidents.insert(id, incident.clone());
        for photo in &photos {
            tables.photos.insert(photo.id, photo.clone());
        }
        Ok((incident, photos))
    }

    async fn find_incident(&self, id: i64) -> StoreResult<Option<Incident>> {
        Ok(self.tables.read().await.incidents.get(&id).cloned())
    }

    async fn list_incidents(&self, filter: IncidentFilter) -> StoreResult<Vec<Incident>> {
        let tables = self.tables.read().await;
        let mut incidents: Vec<Incident> = tables
            .incidents
            .values()
            .filter(|i| match filter {
                IncidentFilter::All => true,
                IncidentFilter::ReportedBy(user_id) => i.reported_by == user_id,
                IncidentFilter::Location(location_id) => i.location_id == Some(location_id),
                IncidentFilter::Status(status) => i.status == status,
            })
            .cloned()
            .collect();
        incidents.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(incidents)
    }

    async fn update_incident(&self, id: i64, patch: IncidentPatch) -> StoreResult<Incident> {
        let mut tables = self.tables.write().await;
        if !tables.incidents.contains_key(&id) {
            return Err(not_found("Incident"));
        }
        if let Some(location_id) = patch.location_id {
            if !tables.locations.contains_key(&location_id) {
                return Err(missing("incidents_location_id_fkey"));
            }
        }
        if let Some(category_id) = patch.category_id {
            if !tables.categories.contains_key(&category_id) {
                return Err(missing("incidents_category_id_fkey"));
            }
        }

        let incident = tables.incidents.get_mut(&id).ok_or_else(|| not_found("Incident"))?;
        if patch.expected_status.is_some_and(|expected| expected != incident.status) {
            return Err(StoreError::Conflict(INCIDENT_STATUS_CHANGED.to_string()));
        }
        if patch.location_id.is_some() {
            incident.location_id = patch.location_id;
        }
        if patch.category_id.is_some() {
            incident.category_id = patch.category_id;
        }
        if let Some(title) = patch.title {
            incident.title = title;
        }
        if let Some(description) = patch.description {
            incident.description = description;
        }
        if let Some(status) = patch.status {
            incident.status = status;
        }
        if let Some(priority) = patch.priority {
            incident.priority = priority;
        }
        incident.updated_at = Utc::now();
        Ok(incident.clone())
    }

    async fn list_incident_photos(&self, incident_id: i64) -> StoreResult<Vec<IncidentPhoto>> {
        let tables = self.tables.read().await;
        Ok(tables
            .photos
            .values()
            .filter(|p| p.incident_id == incident_id)
            .cloned()
            .collect())
    }

    async fn dashboard_counts(&self) -> StoreResult<DashboardCounts> {
        let tables = self.tables.read().await;
        let count = |n: usize| n as i64;
        Ok(DashboardCounts {
            total_guards: count(tables.guards.len()),
            active_clients: count(
                tables
                    .clients
                    .values()
                    .filter(|c| c.status == ClientStatus::Active)
                    .count(),
            ),
            open_incidents: count(
                tables
                    .incidents
                    .values()
                    .filter(|i| i.status == IncidentStatus::Open)
                    .count(),
            ),
            attendance_total: count(tables.attendance.len()),
            attendance_on_time: count(
                tables
                    .attendance
                    .values()
                    .filter(|a| a.status == AttendanceStatus::OnTime)
                    .count(),
            ),
        })
    }

    async fn staff_facts(&self, limit: i64) -> StoreResult<Vec<StaffFacts>> {
        let tables = self.tables.read().await;
        let facts = tables.guards.values().filter_map(|guard| {
            let name = tables.person_name(guard.user_id)?;

            let last_location = tables
                .schedules
                .values()
                .filter(|s| s.guard_id == guard.id)
                .max_by_key(|s| (s.date, s.id))
                .and_then(|s| tables.locations.get(&s.location_id))
                .map(|l| l.name.clone());

            let records: Vec<&Attendance> = tables
                .attendance
                .values()
                .filter(|a| a.guard_id == guard.id)
                .collect();
            let on_time = records
                .iter()
                .filter(|a| a.status == AttendanceStatus::OnTime)
                .count();
            let incidents_reported = tables
                .incidents
                .values()
                .filter(|i| i.reported_by == guard.user_id)
                .count();

            Some(StaffFacts {
                guard: guard.clone(),
                name,
                last_location,
                attendance_total: records.len() as i64,
                attendance_on_time: on_time as i64,
                incidents_reported: incidents_reported as i64,
            })
        });
        Ok(take(facts, limit))
    }

    async fn upcoming_shift_facts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: i64,
    ) -> StoreResult<Vec<UpcomingShiftFacts>> {
        let tables = self.tables.read().await;
        let mut facts: Vec<UpcomingShiftFacts> = tables
            .schedules
            .values()
            .filter(|s| s.date >= from && s.date <= to && s.status.occupies_guard())
            .filter_map(|s| {
                let location = tables.locations.get(&s.location_id)?;
                let shift = tables.shifts.get(&s.shift_id)?;
                let guard = tables.guards.get(&s.guard_id)?;
                let name = tables.person_name(guard.user_id)?;
                Some(UpcomingShiftFacts {
                    schedule_id: s.id,
                    date: s.date,
                    location_name: location.name.clone(),
                    shift_name: shift.name.clone(),
                    start_time: shift.start_time,
                    end_time: shift.end_time,
                    guard: name,
                })
            })
            .collect();
        facts.sort_by_key(|f| (f.date, f.start_time, f.schedule_id));
        Ok(take(facts.into_iter(), limit))
    }

    async fn location_facts(
        &self,
        today: NaiveDate,
        limit: i64,
    ) -> StoreResult<Vec<LocationFacts>> {
        let tables = self.tables.read().await;
        let facts = tables
            .locations
            .values()
            .filter(|l| l.status == LocationStatus::Active)
            .filter_map(|location| {
                let latitude = location.latitude?;
                let longitude = location.longitude?;

                let has_unresolved_incident = tables
                    .incidents
                    .values()
                    .any(|i| i.location_id == Some(location.id) && i.status.is_unresolved());

                let has_late_check_in = tables.attendance.values().any(|a| {
                    a.status.is_late_check_in()
                        && a.schedule_id
                            .and_then(|id| tables.schedules.get(&id))
                            .map_or(false, |s| s.location_id == location.id && s.date == today)
                });

                let guard_on_site = tables
                    .schedules
                    .values()
                    .filter(|s| {
                        s.location_id == location.id && s.date == today && s.status.occupies_guard()
                    })
                    .find_map(|s| {
                        let guard = tables.guards.get(&s.guard_id)?;
                        tables.person_name(guard.user_id)
                    });

                Some(LocationFacts {
                    location_id: location.id,
                    name: location.name.clone(),
                    latitude,
                    longitude,
                    has_unresolved_incident,
                    has_late_check_in,
                    guard_on_site,
                })
            });
        Ok(take(facts, limit))
    }

    async fn recent_incidents(&self, limit: i64) -> StoreResult<Vec<Incident>> {
        let incidents = self.list_incidents(IncidentFilter::All).await?;
        Ok(take(incidents.into_iter(), limit))
    }
}
