//! Domain models for Guard Manager.

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

pub use attendance::{Attendance, AttendanceStatus};
pub use client::{Client, ClientStatus};
pub use guard::{Guard, GuardStatus};
pub use incident::{Incident, IncidentCategory, IncidentPhoto, IncidentPriority, IncidentStatus};
pub use location::{Location, LocationStatus};
pub use role::{Role, RoleName};
pub use schedule::{Schedule, ScheduleStatus};
pub use shift::Shift;
pub use user::User;
