use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rowstore::Row;
use serde::{Deserialize, Serialize};

use crate::common::{ItemId, OrgId};

/// Table name on the hosted platform.
pub const ENTITY: &str = "inventory";

/// An item held in an organization's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub organization_id: OrgId,
    pub item_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: StockStatus,
    pub created_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn from_row(row: &Row) -> Result<Self> {
        serde_json::from_value(row.to_value()).context("Invalid inventory row")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockStatus::InStock => write!(f, "in_stock"),
            StockStatus::LowStock => write!(f, "low_stock"),
            StockStatus::OutOfStock => write!(f, "out_of_stock"),
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in_stock" => Ok(StockStatus::InStock),
            "low_stock" => Ok(StockStatus::LowStock),
            "out_of_stock" => Ok(StockStatus::OutOfStock),
            _ => Err(anyhow::anyhow!("Invalid stock status: {}", s)),
        }
    }
}
