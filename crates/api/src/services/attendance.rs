//! Attendance records.

use std::sync::Arc;

use domain::models::attendance::{
    check_attendance_times, Attendance, AttendanceQuery, CreateAttendanceRequest,
    UpdateAttendanceRequest,
};
use domain::models::role::RoleName;
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};
use validator::Validate;

pub struct AttendanceService {
    store: Arc<dyn WorkforceStore>,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    /// Records a check-in. A caller with the guard role may only record
    /// attendance against their own guard profile, and a referenced schedule
    /// must belong to the same guard.
    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateAttendanceRequest,
    ) -> Result<Attendance, DomainError> {
        authorize(caller, Resource::Attendance, Action::Create)?;
        request.validate()?;
        check_attendance_times(request.check_in_time, request.check_out_time)?;

        if caller.role == RoleName::Guard {
            let own = self.store.find_guard_by_user(caller.user_id).await?;
            if own.map(|g| g.id) != Some(request.guard_id) {
                tracing::debug!(
                    user_id = caller.user_id,
                    guard_id = request.guard_id,
                    "Guard tried to record attendance for another profile"
                );
                return Err(DomainError::Authorization(
                    "Guards may only record their own attendance".to_string(),
                ));
            }
        }

        if let Some(schedule_id) = request.schedule_id {
            let schedule = self
                .store
                .find_schedule(schedule_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Schedule"))?;
            if schedule.guard_id != request.guard_id {
                return Err(DomainError::validation(
                    "Schedule belongs to a different guard",
                ));
            }
        }

        let attendance = self.store.insert_attendance(request.into()).await?;
        tracing::info!(
            attendance_id = attendance.id,
            guard_id = attendance.guard_id,
            status = attendance.status.as_str(),
            "Attendance recorded"
        );
        Ok(attendance)
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<Attendance, DomainError> {
        authorize(caller, Resource::Attendance, Action::Read)?;
        self.store
            .find_attendance(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Attendance"))
    }

    pub async fn list(
        &self,
        caller: &Caller,
        query: AttendanceQuery,
    ) -> Result<Vec<Attendance>, DomainError> {
        authorize(caller, Resource::Attendance, Action::Read)?;
        Ok(self.store.list_attendance(query.into()).await?)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: UpdateAttendanceRequest,
    ) -> Result<Attendance, DomainError> {
        authorize(caller, Resource::Attendance, Action::Update)?;
        request.validate()?;

        let current = self
            .store
            .find_attendance(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Attendance"))?;
        check_attendance_times(
            request.check_in_time.or(current.check_in_time),
            request.check_out_time.or(current.check_out_time),
        )?;

        let attendance = self.store.update_attendance(id, request.into()).await?;
        tracing::info!(
            attendance_id = attendance.id,
            updated_by = caller.user_id,
            "Attendance updated"
        );
        Ok(attendance)
    }
}
