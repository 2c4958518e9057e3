//! Role domain model.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The fixed set of roles. Seeded by migration with ids 1 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Admin,
    ChiefOfStaff,
    TeamLeader,
    Guard,
}

impl RoleName {
    pub const ALL: [RoleName; 4] = [
        RoleName::Admin,
        RoleName::ChiefOfStaff,
        RoleName::TeamLeader,
        RoleName::Guard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::ChiefOfStaff => "chief_of_staff",
            RoleName::TeamLeader => "team_leader",
            RoleName::Guard => "guard",
        }
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(RoleName::Admin),
            "chief_of_staff" => Ok(RoleName::ChiefOfStaff),
            "team_leader" => Ok(RoleName::TeamLeader),
            "guard" => Ok(RoleName::Guard),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored role row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i64,
    pub name: RoleName,
}
