//! Store-backed inventory operations.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rowstore::{require, Filter, Guard, RowStore, SortOrder};
use serde_json::json;
use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{ItemId, OrgId};

use super::models::{InventoryItem, StockStatus, ENTITY};

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewItem<'a> {
    pub organization_id: OrgId,
    pub item_name: &'a str,
    pub quantity: u32,
    #[builder(default)]
    pub category: Option<&'a str>,
    #[builder(default)]
    pub location: Option<&'a str>,
    #[builder(default)]
    pub notes: Option<&'a str>,
    #[builder(default = StockStatus::InStock)]
    pub status: StockStatus,
}

pub async fn add_item(store: &dyn RowStore, params: &NewItem<'_>) -> Result<InventoryItem> {
    let fields = json!({
        "organization_id": params.organization_id,
        "item_name": params.item_name,
        "quantity": params.quantity,
        "category": params.category,
        "location": params.location,
        "notes": params.notes,
        "status": params.status.to_string(),
        "created_at": Utc::now(),
    })
    .as_object()
    .cloned()
    .context("inventory fields must serialize to an object")?;

    let row = store.insert(ENTITY, fields).await?;
    InventoryItem::from_row(&row)
}

/// All of an organization's items, newest first.
pub async fn list_for_org(store: &dyn RowStore, org_id: OrgId) -> Result<Vec<InventoryItem>> {
    let rows = store
        .select(
            ENTITY,
            Filter::new()
                .eq("organization_id", org_id.to_string())
                .order("created_at", SortOrder::Descending),
        )
        .await?;
    rows.iter().map(InventoryItem::from_row).collect()
}

/// In-stock items only, as offered when creating a post from inventory.
pub async fn list_in_stock(store: &dyn RowStore, org_id: OrgId) -> Result<Vec<InventoryItem>> {
    let rows = store
        .select(
            ENTITY,
            Filter::new()
                .eq("organization_id", org_id.to_string())
                .eq("status", StockStatus::InStock.to_string())
                .order("item_name", SortOrder::Ascending),
        )
        .await?;
    rows.iter().map(InventoryItem::from_row).collect()
}

pub async fn delete_item(store: &dyn RowStore, id: ItemId) -> Result<()> {
    store.delete(ENTITY, id.into_uuid()).await?;
    Ok(())
}

/// Consume `amount` units from an item, deleting it when it hits zero.
///
/// Guarded on the quantity read here, so a concurrent draw-down fails
/// rather than double-spending stock. Returns the remaining item, or
/// `None` if it was exhausted and removed.
pub async fn draw_down(
    store: &dyn RowStore,
    id: ItemId,
    amount: u32,
) -> Result<Option<InventoryItem>> {
    let row = require(store, ENTITY, id.into_uuid()).await?;
    let item = InventoryItem::from_row(&row)?;
    if amount > item.quantity {
        bail!(
            "Cannot draw {} units from \"{}\": only {} in stock",
            amount,
            item.item_name,
            item.quantity
        );
    }

    let remaining = item.quantity - amount;
    if remaining == 0 {
        store.delete(ENTITY, id.into_uuid()).await?;
        info!(item_id = %id, "Inventory item exhausted and removed");
        return Ok(None);
    }

    let mut fields = rowstore::Fields::new();
    fields.insert("quantity".to_string(), json!(remaining));
    let updated = store
        .update(
            ENTITY,
            id.into_uuid(),
            fields,
            Guard::expect("quantity", item.quantity),
        )
        .await?;
    InventoryItem::from_row(&updated).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowstore::testing::InMemoryStore;

    async fn seeded_item(store: &InMemoryStore, quantity: u32) -> InventoryItem {
        add_item(
            store,
            &NewItem::builder()
                .organization_id(OrgId::new())
                .item_name("Canned Beans")
                .quantity(quantity)
                .category(Some("canned"))
                .build(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn draw_down_updates_remaining_quantity() {
        let store = InMemoryStore::new();
        let item = seeded_item(&store, 100).await;

        let remaining = draw_down(&store, item.id, 40).await.unwrap().unwrap();
        assert_eq!(remaining.quantity, 60);
    }

    #[tokio::test]
    async fn draw_down_to_zero_removes_the_item() {
        let store = InMemoryStore::new();
        let item = seeded_item(&store, 25).await;

        assert!(draw_down(&store, item.id, 25).await.unwrap().is_none());
        assert!(list_for_org(&store, item.organization_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn draw_down_rejects_overdraw() {
        let store = InMemoryStore::new();
        let item = seeded_item(&store, 10).await;
        assert!(draw_down(&store, item.id, 11).await.is_err());
    }

    #[tokio::test]
    async fn list_in_stock_skips_other_statuses() {
        let store = InMemoryStore::new();
        let org = OrgId::new();
        add_item(
            &store,
            &NewItem::builder()
                .organization_id(org)
                .item_name("Rice")
                .quantity(5u32)
                .status(StockStatus::LowStock)
                .build(),
        )
        .await
        .unwrap();
        add_item(
            &store,
            &NewItem::builder()
                .organization_id(org)
                .item_name("Beans")
                .quantity(50u32)
                .build(),
        )
        .await
        .unwrap();

        let in_stock = list_in_stock(&store, org).await.unwrap();
        assert_eq!(in_stock.len(), 1);
        assert_eq!(in_stock[0].item_name, "Beans");
    }
}
