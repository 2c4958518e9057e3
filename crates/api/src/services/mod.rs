//! Application services.
//!
//! Each service checks the caller against the access policy, validates input,
//! and drives the store. Handlers stay thin.

pub mod admin_bootstrap;
pub mod attendance;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod guards;
pub mod incident_categories;
pub mod incidents;
pub mod locations;
pub mod photo_storage;
pub mod schedules;
pub mod shifts;
pub mod users;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use clients::ClientService;
pub use dashboard::DashboardService;
pub use guards::GuardService;
pub use incident_categories::IncidentCategoryService;
pub use incidents::IncidentService;
pub use locations::LocationService;
pub use photo_storage::{LocalPhotoStore, MemoryPhotoStore};
pub use schedules::ScheduleService;
pub use shifts::ShiftService;
pub use users::UserService;

use domain::DomainError;
use shared::password::PasswordError;

use crate::middleware::metrics::record_schedule_conflict;

pub(crate) fn hash_error(err: PasswordError) -> DomainError {
    DomainError::Internal(format!("Password hashing failed: {}", err))
}

/// Counts and logs writes rejected by the overlap check.
pub(crate) fn note_conflict(err: DomainError) -> DomainError {
    if let DomainError::ScheduleConflict {
        conflicting_schedule_id,
    } = &err
    {
        record_schedule_conflict();
        tracing::info!(conflicting_schedule_id, "Schedule rejected by overlap check");
    }
    err
}
