//! Database entity definitions.
//!
//! These structs map directly to database rows and are converted into domain
//! models at the repository boundary.

pub mod attendance;
pub mod client;
pub mod dashboard;
pub mod guard;
pub mod incident;
pub mod location;
pub mod role;
pub mod schedule;
pub mod shift;
pub mod user;

pub use attendance::{AttendanceEntity, AttendanceStatusDb};
pub use client::{ClientEntity, ClientStatusDb};
pub use dashboard::{DashboardCountsRow, LocationFactsRow, StaffFactsRow, UpcomingShiftRow};
pub use guard::{GuardEntity, GuardStatusDb};
pub use incident::{
    CategoryPriorityDb, IncidentCategoryEntity, IncidentEntity, IncidentPhotoEntity,
    IncidentPriorityDb, IncidentStatusDb,
};
pub use location::{LocationEntity, LocationStatusDb};
pub use role::{RoleEntity, RoleNameDb};
pub use schedule::{BookedShiftRow, ScheduleEntity, ScheduleStatusDb, ScheduleWindowRow};
pub use shift::ShiftEntity;
pub use user::UserEntity;
