//! Store-backed inbox operations.

use anyhow::Result;
use rowstore::{require, Filter, Guard, RowStore, SortOrder};
use serde_json::json;

use crate::common::{MessageId, OrgId};

use super::models::{Message, ENTITY};
use super::notifier::{Notification, Notifier, StoreNotifier};

pub async fn send_message(
    store: &dyn RowStore,
    from: OrgId,
    to: OrgId,
    subject: &str,
    body: &str,
) -> Result<MessageId> {
    let id = StoreNotifier::new(store)
        .send(Notification {
            sender_org_id: from,
            recipient_org_id: to,
            subject,
            body,
            related_post_id: None,
        })
        .await?;
    Ok(id)
}

/// Full conversation history for an organization: everything it sent or
/// received, newest first. The store filters are single-column equality,
/// so the two directions are fetched separately and merged.
pub async fn fetch_for_org(store: &dyn RowStore, org_id: OrgId) -> Result<Vec<Message>> {
    let received = store
        .select(
            ENTITY,
            Filter::new().eq("recipient_org_id", org_id.to_string()),
        )
        .await?;
    let sent = store
        .select(ENTITY, Filter::new().eq("sender_org_id", org_id.to_string()))
        .await?;

    let mut messages = received
        .iter()
        .chain(sent.iter())
        .map(Message::from_row)
        .collect::<Result<Vec<_>>>()?;
    messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    messages.dedup_by_key(|m| m.id);
    Ok(messages)
}

pub async fn mark_read(store: &dyn RowStore, id: MessageId) -> Result<Message> {
    let mut fields = rowstore::Fields::new();
    fields.insert("read".to_string(), json!(true));
    let row = store
        .update(ENTITY, id.into_uuid(), fields, Guard::None)
        .await?;
    Message::from_row(&row)
}

/// Unread inbox count, as shown on the dashboard badge.
pub async fn unread_count(store: &dyn RowStore, org_id: OrgId) -> Result<usize> {
    let rows = store
        .select(
            ENTITY,
            Filter::new()
                .eq("recipient_org_id", org_id.to_string())
                .eq("read", false)
                .order("created_at", SortOrder::Descending),
        )
        .await?;
    Ok(rows.len())
}

pub async fn fetch_message(store: &dyn RowStore, id: MessageId) -> Result<Message> {
    let row = require(store, ENTITY, id.into_uuid()).await?;
    Message::from_row(&row)
}
