use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rowstore::Row;
use serde::{Deserialize, Serialize};

use crate::common::{OrgId, PostId, ProfileId};

/// Table name on the hosted platform.
pub const ENTITY: &str = "supply_posts";

/// A surplus or need listing posted by an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyPost {
    pub id: PostId,
    pub organization_id: OrgId,
    #[serde(default)]
    pub posted_by: Option<ProfileId>,

    pub item_name: String,
    /// Free-text quantity as displayed ("40 units").
    pub quantity: String,
    /// Total claimable units.
    pub quantity_numeric: u32,
    /// Units committed across all claims so far.
    #[serde(default)]
    pub quantity_claimed: u32,

    #[serde(rename = "type")]
    pub post_type: PostType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,

    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

impl SupplyPost {
    pub fn from_row(row: &Row) -> Result<Self> {
        serde_json::from_value(row.to_value()).context("Invalid supply_posts row")
    }

    /// Units still claimable.
    pub fn available_quantity(&self) -> u32 {
        self.quantity_numeric.saturating_sub(self.quantity_claimed)
    }
}

/// Whether a post offers surplus or asks for help.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    /// Surplus offered for claiming.
    Excess,
    /// A request for supplies.
    Need,
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostType::Excess => write!(f, "excess"),
            PostType::Need => write!(f, "need"),
        }
    }
}

impl std::str::FromStr for PostType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "excess" => Ok(PostType::Excess),
            "need" => Ok(PostType::Need),
            _ => Err(anyhow::anyhow!("Invalid post type: {}", s)),
        }
    }
}

/// Post lifecycle.
///
/// `Active ⇄ Completed`: a post completes when its quantity is exhausted
/// or a claim on it is marked complete, and reopens when a claim is
/// cancelled. `Cancelled` is a poster-side withdrawal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Active,
    Completed,
    Cancelled,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Active => write!(f, "active"),
            PostStatus::Completed => write!(f, "completed"),
            PostStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(PostStatus::Active),
            "completed" => Ok(PostStatus::Completed),
            "cancelled" => Ok(PostStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid post status: {}", s)),
        }
    }
}
