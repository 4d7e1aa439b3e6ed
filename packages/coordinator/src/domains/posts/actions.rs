//! Store-backed post operations.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rowstore::{Filter, RowStore, SortOrder};
use serde_json::json;
use tracing::info;
use typed_builder::TypedBuilder;

use crate::common::{ItemId, OrgId, ProfileId};
use crate::domains::inventory;
use crate::domains::organizations::models::{Organization, ENTITY as ORG_ENTITY};

use super::feed::FeedPost;
use super::models::{PostStatus, PostType, SupplyPost, ENTITY};

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewPost<'a> {
    pub organization_id: OrgId,
    #[builder(default)]
    pub posted_by: Option<ProfileId>,
    pub item_name: &'a str,
    pub quantity: u32,
    pub post_type: PostType,
    #[builder(default)]
    pub category: Option<&'a str>,
    #[builder(default)]
    pub expiration_date: Option<NaiveDate>,
    #[builder(default)]
    pub notes: Option<&'a str>,
    /// Inventory item backing an excess post; its stock is drawn down by
    /// the posted quantity.
    #[builder(default)]
    pub from_inventory: Option<ItemId>,
}

/// Create a post, drawing down the backing inventory item if one was
/// chosen. The draw-down runs first so a stock shortfall aborts before
/// anything is published.
pub async fn create_post(store: &dyn RowStore, params: &NewPost<'_>) -> Result<SupplyPost> {
    if let Some(item_id) = params.from_inventory {
        inventory::actions::draw_down(store, item_id, params.quantity)
            .await
            .context("Could not draw posted quantity from inventory")?;
    }

    let fields = json!({
        "organization_id": params.organization_id,
        "posted_by": params.posted_by,
        "item_name": params.item_name,
        "quantity": format!("{} units", params.quantity),
        "quantity_numeric": params.quantity,
        "quantity_claimed": 0,
        "type": params.post_type.to_string(),
        "category": params.category,
        "expiration_date": params.expiration_date,
        "notes": params.notes,
        "status": PostStatus::Active.to_string(),
        "created_at": Utc::now(),
    })
    .as_object()
    .cloned()
    .context("post fields must serialize to an object")?;

    let row = store.insert(ENTITY, fields).await?;
    let post = SupplyPost::from_row(&row)?;
    info!(post_id = %post.id, item = %post.item_name, kind = %post.post_type, "Post created");
    Ok(post)
}

/// Active posts network-wide, newest first.
pub async fn fetch_active_posts(store: &dyn RowStore) -> Result<Vec<SupplyPost>> {
    let rows = store
        .select(
            ENTITY,
            Filter::new()
                .eq("status", PostStatus::Active.to_string())
                .order("created_at", SortOrder::Descending),
        )
        .await?;
    rows.iter().map(SupplyPost::from_row).collect()
}

/// An organization's own posts, any status, newest first.
pub async fn fetch_org_posts(store: &dyn RowStore, org_id: OrgId) -> Result<Vec<SupplyPost>> {
    let rows = store
        .select(
            ENTITY,
            Filter::new()
                .eq("organization_id", org_id.to_string())
                .order("created_at", SortOrder::Descending),
        )
        .await?;
    rows.iter().map(SupplyPost::from_row).collect()
}

/// The supply feed: active posts joined with their posters' names.
pub async fn fetch_feed(store: &dyn RowStore) -> Result<Vec<FeedPost>> {
    let posts = fetch_active_posts(store).await?;

    let org_rows = store.select(ORG_ENTITY, Filter::new()).await?;
    let names: HashMap<OrgId, String> = org_rows
        .iter()
        .map(Organization::from_row)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .map(|org| (org.id, org.name))
        .collect();

    Ok(posts
        .into_iter()
        .map(|post| {
            let organization_name = names.get(&post.organization_id).cloned();
            FeedPost {
                post,
                organization_name,
            }
        })
        .collect())
}
