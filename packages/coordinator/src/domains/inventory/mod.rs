//! Warehouse inventory tracked per organization; posts can draw from it.

pub mod actions;
pub mod models;

pub use models::{InventoryItem, StockStatus};
