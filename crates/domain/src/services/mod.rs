//! Domain services for Guard Manager.
//!
//! Pure business rules: who may do what, when schedules collide, how incidents
//! move through their lifecycle, and how dashboard views are derived.

pub mod access_policy;
pub mod aggregation;
pub mod incident_lifecycle;
pub mod scheduling;

pub use access_policy::{authorize, is_allowed, Action, Caller, Resource};
pub use incident_lifecycle::{check_transition, validate_photo_batch, PhotoLimits};
pub use scheduling::{
    find_conflict, neighbouring_dates, retimed_shift_conflict, BookedShift, ScheduledWindow,
    ShiftWindow,
};
