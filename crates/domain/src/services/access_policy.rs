//! Role-based access policy.
//!
//! One table maps every `(Resource, Action)` pair to the roles allowed to
//! perform it. Service operations call [`authorize`] before touching the store;
//! nothing else carries its own role list. Roles are flat: no role implies
//! another.

use serde::Serialize;

use crate::errors::DomainError;
use crate::models::role::RoleName;

use RoleName::{Admin, ChiefOfStaff, Guard, TeamLeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    User,
    Guard,
    Client,
    Location,
    Shift,
    Schedule,
    Attendance,
    IncidentCategory,
    Incident,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    /// Move an incident to any status, bypassing the linear lifecycle.
    OverrideTransition,
}

/// The authenticated identity a service operation runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub role: RoleName,
}

impl Caller {
    pub fn new(user_id: i64, role: RoleName) -> Self {
        Self { user_id, role }
    }
}

const ALL_ROLES: &[RoleName] = &[Admin, ChiefOfStaff, TeamLeader, Guard];
const ADMIN_ONLY: &[RoleName] = &[Admin];
const MANAGERS: &[RoleName] = &[Admin, ChiefOfStaff];
const SUPERVISORS: &[RoleName] = &[Admin, ChiefOfStaff, TeamLeader];
const NOBODY: &[RoleName] = &[];

/// Roles allowed to perform `action` on `resource`.
pub fn allowed_roles(resource: Resource, action: Action) -> &'static [RoleName] {
    use Action::*;
    use Resource as R;

    match (resource, action) {
        (R::User, Create) => ADMIN_ONLY,
        (R::User, Read) => MANAGERS,
        (R::User, Update) => ADMIN_ONLY,

        (R::Guard | R::Client | R::Location | R::Shift | R::IncidentCategory, Create) => MANAGERS,
        (R::Guard | R::Client | R::Location | R::Shift | R::IncidentCategory, Read) => ALL_ROLES,
        (R::Guard | R::Client | R::Location | R::Shift | R::IncidentCategory, Update) => MANAGERS,

        (R::Schedule, Create) => SUPERVISORS,
        (R::Schedule, Read) => ALL_ROLES,
        (R::Schedule, Update) => SUPERVISORS,

        (R::Attendance, Create) => ALL_ROLES,
        (R::Attendance, Read) => ALL_ROLES,
        (R::Attendance, Update) => SUPERVISORS,

        (R::Incident, Create) => ALL_ROLES,
        (R::Incident, Read) => ALL_ROLES,
        (R::Incident, Update) => SUPERVISORS,
        (R::Incident, OverrideTransition) => ADMIN_ONLY,

        (R::Dashboard, Read) => ALL_ROLES,

        _ => NOBODY,
    }
}

pub fn is_allowed(role: RoleName, resource: Resource, action: Action) -> bool {
    allowed_roles(resource, action).contains(&role)
}

/// Fails with `Authorization` unless the caller's role may perform the action.
pub fn authorize(caller: &Caller, resource: Resource, action: Action) -> Result<(), DomainError> {
    if is_allowed(caller.role, resource, action) {
        Ok(())
    } else {
        Err(DomainError::Authorization(format!(
            "Role {} may not {:?} {:?}",
            caller.role, action, resource
        )))
    }
}
