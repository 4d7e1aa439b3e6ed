use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rowstore::Row;
use serde::{Deserialize, Serialize};

use crate::common::{OrgId, ProfileId};
use crate::domains::availability::WeeklySchedule;

/// Table names on the hosted platform.
pub const ENTITY: &str = "organizations";
pub const PROFILE_ENTITY: &str = "profiles";

/// A food-relief organization in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Published weekly pickup hours. `None` until the organization sets
    /// them; claims against its posts cannot be scheduled before then.
    #[serde(default)]
    pub availability: Option<WeeklySchedule>,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn from_row(row: &Row) -> Result<Self> {
        serde_json::from_value(row.to_value()).context("Invalid organizations row")
    }
}

/// A user account tied to an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub organization_id: OrgId,
    pub full_name: String,
    pub role: Role,
}

impl Profile {
    pub fn from_row(row: &Row) -> Result<Self> {
        serde_json::from_value(row.to_value()).context("Invalid profiles row")
    }
}

/// Role within an organization. The founder of a new organization is its
/// admin; everyone who joins later is a member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn from_row_parses_availability_when_present() {
        let row = Row::new(
            Uuid::new_v4(),
            json!({
                "name": "North Shelf",
                "address": "12 Lake St",
                "phone": null,
                "email": "hello@northshelf.org",
                "description": null,
                "availability": {
                    "monday": {"enabled": true, "start": "09:00", "end": "17:00"}
                },
                "created_at": "2026-08-01T12:00:00Z"
            })
            .as_object()
            .unwrap()
            .clone(),
        );

        let org = Organization::from_row(&row).unwrap();
        let schedule = org.availability.unwrap();
        assert!(schedule.monday.enabled);
        assert!(!schedule.tuesday.enabled);
    }

    #[test]
    fn from_row_accepts_missing_availability() {
        let row = Row::new(
            Uuid::new_v4(),
            json!({
                "name": "South Pantry",
                "created_at": "2026-08-01T12:00:00Z"
            })
            .as_object()
            .unwrap()
            .clone(),
        );
        assert!(Organization::from_row(&row).unwrap().availability.is_none());
    }
}
