use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rowstore::Row;
use serde::{Deserialize, Serialize};

use crate::common::{ClaimId, OrgId, PostId, ProfileId};

/// Table name on the hosted platform.
pub const ENTITY: &str = "claims";

/// A reservation of units from a supply post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub post_id: PostId,
    pub claiming_org_id: OrgId,
    #[serde(default)]
    pub claimed_by: Option<ProfileId>,
    pub quantity_claimed: u32,
    /// Scheduled pickup, stored as the chosen wall-clock slot in UTC.
    #[serde(default)]
    pub pickup_time: Option<DateTime<Utc>>,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

impl Claim {
    pub fn from_row(row: &Row) -> Result<Self> {
        serde_json::from_value(row.to_value()).context("Invalid claims row")
    }
}

/// Claim lifecycle. A claim starts pending; the poster confirms or
/// cancels it, and only a confirmed claim completes on pickup.
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ClaimStatus {
    /// Whether the transition to `next` is allowed.
    pub fn can_transition_to(self, next: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed)
        )
    }

    /// True while the claim still holds units on its post.
    pub fn is_open(self) -> bool {
        matches!(self, ClaimStatus::Pending | ClaimStatus::Confirmed)
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimStatus::Pending => write!(f, "pending"),
            ClaimStatus::Confirmed => write!(f, "confirmed"),
            ClaimStatus::Completed => write!(f, "completed"),
            ClaimStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ClaimStatus::Pending),
            "confirmed" => Ok(ClaimStatus::Confirmed),
            "completed" => Ok(ClaimStatus::Completed),
            "cancelled" => Ok(ClaimStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid claim status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_claims_can_be_confirmed_or_cancelled() {
        assert!(ClaimStatus::Pending.can_transition_to(ClaimStatus::Confirmed));
        assert!(ClaimStatus::Pending.can_transition_to(ClaimStatus::Cancelled));
        assert!(!ClaimStatus::Pending.can_transition_to(ClaimStatus::Completed));
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for terminal in [ClaimStatus::Completed, ClaimStatus::Cancelled] {
            for next in [
                ClaimStatus::Pending,
                ClaimStatus::Confirmed,
                ClaimStatus::Completed,
                ClaimStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
            assert!(!terminal.is_open());
        }
    }

    #[test]
    fn confirmed_claims_only_complete() {
        assert!(ClaimStatus::Confirmed.can_transition_to(ClaimStatus::Completed));
        assert!(!ClaimStatus::Confirmed.can_transition_to(ClaimStatus::Cancelled));
        assert!(!ClaimStatus::Confirmed.can_transition_to(ClaimStatus::Pending));
        assert!(ClaimStatus::Confirmed.is_open());
    }
}
