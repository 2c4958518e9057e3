//! Guard schedules.
//!
//! The overlap rule is enforced by the store inside the same atomic operation
//! as the write; this service only translates the outcome and enriches reads.

use std::collections::HashMap;
use std::sync::Arc;

use domain::models::guard::GuardSummary;
use domain::models::location::LocationSummary;
use domain::models::schedule::{
    CreateScheduleRequest, Schedule, ScheduleQuery, ScheduleView, UpdateScheduleRequest,
};
use domain::models::shift::ShiftSummary;
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};

use crate::middleware::metrics::record_schedule_created;
use crate::services::note_conflict;

pub struct ScheduleService {
    store: Arc<dyn WorkforceStore>,
}

/// Join targets loaded once per list call.
struct Joins {
    guards: HashMap<i64, GuardSummary>,
    locations: HashMap<i64, LocationSummary>,
    shifts: HashMap<i64, ShiftSummary>,
}

impl Joins {
    fn view(&self, schedule: Schedule) -> ScheduleView {
        ScheduleView {
            guard: self.guards.get(&schedule.guard_id).cloned(),
            location: self.locations.get(&schedule.location_id).cloned(),
            shift: self.shifts.get(&schedule.shift_id).cloned(),
            schedule,
        }
    }
}

impl ScheduleService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateScheduleRequest,
    ) -> Result<ScheduleView, DomainError> {
        authorize(caller, Resource::Schedule, Action::Create)?;

        let schedule = self
            .store
            .insert_schedule(request.into())
            .await
            .map_err(|e| note_conflict(e.into()))?;

        record_schedule_created();
        tracing::info!(
            schedule_id = schedule.id,
            guard_id = schedule.guard_id,
            date = %schedule.date,
            "Schedule created"
        );
        self.respond(schedule).await
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<ScheduleView, DomainError> {
        authorize(caller, Resource::Schedule, Action::Read)?;
        let schedule = self
            .store
            .find_schedule(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Schedule"))?;
        self.respond(schedule).await
    }

    /// Exactly one query mode must be supplied.
    pub async fn list(
        &self,
        caller: &Caller,
        query: ScheduleQuery,
    ) -> Result<Vec<ScheduleView>, DomainError> {
        authorize(caller, Resource::Schedule, Action::Read)?;
        let filter = query.into_filter()?;

        let schedules = self.store.list_schedules(filter).await?;
        if schedules.is_empty() {
            return Ok(Vec::new());
        }

        let joins = self.load_joins().await?;
        Ok(schedules.into_iter().map(|s| joins.view(s)).collect())
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: UpdateScheduleRequest,
    ) -> Result<ScheduleView, DomainError> {
        authorize(caller, Resource::Schedule, Action::Update)?;

        let schedule = self
            .store
            .update_schedule(id, request.into())
            .await
            .map_err(|e| note_conflict(e.into()))?;

        tracing::info!(
            schedule_id = schedule.id,
            status = schedule.status.as_str(),
            updated_by = caller.user_id,
            "Schedule updated"
        );
        self.respond(schedule).await
    }

    async fn load_joins(&self) -> Result<Joins, DomainError> {
        let guards = self
            .store
            .list_guards()
            .await?
            .iter()
            .map(|g| (g.id, GuardSummary::from(g)))
            .collect();
        let locations = self
            .store
            .list_locations(None)
            .await?
            .iter()
            .map(|l| (l.id, LocationSummary::from(l)))
            .collect();
        let shifts = self
            .store
            .list_shifts()
            .await?
            .iter()
            .map(|s| (s.id, ShiftSummary::from(s)))
            .collect();

        Ok(Joins {
            guards,
            locations,
            shifts,
        })
    }

    async fn respond(&self, schedule: Schedule) -> Result<ScheduleView, DomainError> {
        let guard = self.store.find_guard(schedule.guard_id).await?;
        let location = self.store.find_location(schedule.location_id).await?;
        let shift = self.store.find_shift(schedule.shift_id).await?;

        Ok(ScheduleView {
            guard: guard.as_ref().map(GuardSummary::from),
            location: location.as_ref().map(LocationSummary::from),
            shift: shift.as_ref().map(ShiftSummary::from),
            schedule,
        })
    }
}
