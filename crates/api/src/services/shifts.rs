//! Shift templates.

use std::sync::Arc;

use domain::models::shift::{check_shift_times, CreateShiftRequest, Shift, UpdateShiftRequest};
use domain::services::{authorize, Action, Caller, Resource};
use domain::{DomainError, WorkforceStore};
use validator::Validate;

use crate::services::note_conflict;

pub struct ShiftService {
    store: Arc<dyn WorkforceStore>,
}

impl ShiftService {
    pub fn new(store: Arc<dyn WorkforceStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateShiftRequest,
    ) -> Result<Shift, DomainError> {
        authorize(caller, Resource::Shift, Action::Create)?;
        request.validate()?;

        let shift = self.store.insert_shift(request.into_new_shift()?).await?;
        tracing::info!(shift_id = shift.id, overnight = shift.is_overnight(), "Shift created");
        Ok(shift)
    }

    pub async fn get(&self, caller: &Caller, id: i64) -> Result<Shift, DomainError> {
        authorize(caller, Resource::Shift, Action::Read)?;
        self.store
            .find_shift(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Shift"))
    }

    pub async fn list(&self, caller: &Caller) -> Result<Vec<Shift>, DomainError> {
        authorize(caller, Resource::Shift, Action::Read)?;
        Ok(self.store.list_shifts().await?)
    }

    pub async fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: UpdateShiftRequest,
    ) -> Result<Shift, DomainError> {
        authorize(caller, Resource::Shift, Action::Update)?;
        request.validate()?;
        let patch = request.into_patch()?;

        let current = self
            .store
            .find_shift(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Shift"))?;
        check_shift_times(
            patch.start_time.unwrap_or(current.start_time),
            patch.end_time.unwrap_or(current.end_time),
        )?;

        let shift = self
            .store
            .update_shift(id, patch)
            .await
            .map_err(|e| note_conflict(e.into()))?;
        tracing::info!(shift_id = shift.id, updated_by = caller.user_id, "Shift updated");
        Ok(shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{
        admin, caller, date, memory_store, seed_guard, seed_location, shift_id,
    };
    use domain::models::role::RoleName;
    use domain::models::schedule::{NewSchedule, ScheduleStatus};

    fn request(name: &str, start: &str, end: &str) -> CreateShiftRequest {
        CreateShiftRequest {
            name: name.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_overnight_shift() {
        let service = ShiftService::new(memory_store());
        let shift = service
            .create(&admin(), request("Late Watch", "23:00", "07:00"))
            .await
            .unwrap();
        assert!(shift.is_overnight());

        let json = serde_json::to_value(&shift).unwrap();
        assert_eq!(json["startTime"], "23:00");
        assert_eq!(json["endTime"], "07:00");
    }

    #[tokio::test]
    async fn test_bad_times_rejected() {
        let service = ShiftService::new(memory_store());
        assert!(matches!(
            service.create(&admin(), request("Broken", "25:00", "07:00")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.create(&admin(), request("Empty", "08:00", "08:00")).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_cannot_collapse_window() {
        let service = ShiftService::new(memory_store());
        let shift = service
            .create(&admin(), request("Day", "08:00", "16:00"))
            .await
            .unwrap();

        let err = service
            .update(
                &admin(),
                shift.id,
                UpdateShiftRequest {
                    end_time: Some("08:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let updated = service
            .update(
                &admin(),
                shift.id,
                UpdateShiftRequest {
                    end_time: Some("18:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(shared::validation::format_wall_clock(updated.end_time), "18:00");
    }

    #[tokio::test]
    async fn test_seeded_shifts_visible_to_guards() {
        let service = ShiftService::new(memory_store());
        let shifts = service.list(&caller(RoleName::Guard)).await.unwrap();
        assert_eq!(shifts.len(), 5);
        assert!(shifts.iter().any(|s| s.name == "Night" && s.is_overnight()));
    }

    async fn book(
        store: &Arc<dyn WorkforceStore>,
        guard_id: i64,
        location_id: i64,
        shift: &str,
        status: ScheduleStatus,
    ) -> i64 {
        let shift_id = shift_id(store, shift).await;
        store
            .insert_schedule(NewSchedule {
                guard_id,
                location_id,
                shift_id,
                date: date(2024, 3, 2),
                status,
            })
            .await
            .unwrap()
            .id
    }

    fn end_at(time: &str) -> UpdateShiftRequest {
        UpdateShiftRequest {
            end_time: Some(time.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_retiming_rejected_when_bookings_would_overlap() {
        let store = memory_store();
        let guard = seed_guard(&store, "g.retime", "G-2024-300").await;
        let site = seed_location(&store, "Harbour Gate").await;
        book(&store, guard.id, site.id, "Morning", ScheduleStatus::Scheduled).await;
        let afternoon =
            book(&store, guard.id, site.id, "Afternoon", ScheduleStatus::Scheduled).await;
        let morning = shift_id(&store, "Morning").await;
        let service = ShiftService::new(store.clone());

        let err = service
            .update(&admin(), morning, end_at("18:00"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::ScheduleConflict {
                conflicting_schedule_id: afternoon
            }
        );

        let unchanged = store.find_shift(morning).await.unwrap().unwrap();
        assert_eq!(shared::validation::format_wall_clock(unchanged.end_time), "14:00");

        // Shrinking never collides, and renaming leaves the times alone.
        service.update(&admin(), morning, end_at("13:00")).await.unwrap();
        let renamed = service
            .update(
                &admin(),
                morning,
                UpdateShiftRequest {
                    name: Some("Early".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Early");
    }

    #[tokio::test]
    async fn test_retiming_ignores_cancelled_bookings() {
        let store = memory_store();
        let guard = seed_guard(&store, "g.cancelled", "G-2024-301").await;
        let site = seed_location(&store, "North Lot").await;
        book(&store, guard.id, site.id, "Morning", ScheduleStatus::Scheduled).await;
        book(&store, guard.id, site.id, "Afternoon", ScheduleStatus::Cancelled).await;
        let morning = shift_id(&store, "Morning").await;
        let service = ShiftService::new(store);

        let updated = service.update(&admin(), morning, end_at("18:00")).await.unwrap();
        assert_eq!(shared::validation::format_wall_clock(updated.end_time), "18:00");
    }
}
