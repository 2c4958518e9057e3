//! Repository implementations for database operations.

pub mod attendance;
pub mod client;
pub mod dashboard;
pub mod guard;
pub mod incident;
pub mod incident_category;
pub mod location;
pub mod role;
pub mod schedule;
pub mod shift;
pub mod user;

pub use attendance::AttendanceRepository;
pub use client::ClientRepository;
pub use dashboard::DashboardRepository;
pub use guard::GuardRepository;
pub use incident::IncidentRepository;
pub use incident_category::IncidentCategoryRepository;
pub use location::LocationRepository;
pub use role::RoleRepository;
pub use schedule::{ScheduleRepository, ScheduleWrite};
pub use shift::{ShiftRepository, ShiftWrite};
pub use user::UserRepository;
