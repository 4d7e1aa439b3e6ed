//! Delivery seam for claim notifications.
//!
//! Claim processing only needs "tell this organization something"; the
//! [`Notifier`] trait keeps it independent of the transport. The default
//! [`StoreNotifier`] writes to the `messages` table, which the inbox UI
//! watches through the store's change feed.

use async_trait::async_trait;
use chrono::Utc;
use rowstore::{RowStore, StoreError};
use serde_json::json;
use tracing::debug;

use crate::common::{MessageId, OrgId, PostId};

use super::models::ENTITY;

/// One notification addressed to an organization.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification<'a> {
    pub sender_org_id: OrgId,
    pub recipient_org_id: OrgId,
    pub subject: &'a str,
    pub body: &'a str,
    pub related_post_id: Option<PostId>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, note: Notification<'_>) -> Result<MessageId, StoreError>;
}

/// Delivers notifications as unread rows in the `messages` table.
pub struct StoreNotifier<'a> {
    store: &'a dyn RowStore,
}

impl<'a> StoreNotifier<'a> {
    pub fn new(store: &'a dyn RowStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Notifier for StoreNotifier<'_> {
    async fn send(&self, note: Notification<'_>) -> Result<MessageId, StoreError> {
        let fields = json!({
            "sender_org_id": note.sender_org_id,
            "recipient_org_id": note.recipient_org_id,
            "subject": note.subject,
            "body": note.body,
            "related_post_id": note.related_post_id,
            "read": false,
            "created_at": Utc::now(),
        })
        .as_object()
        .cloned()
        .ok_or_else(|| StoreError::Backend(anyhow::anyhow!("message fields must be an object")))?;

        let row = self.store.insert(ENTITY, fields).await?;
        debug!(recipient = %note.recipient_org_id, subject = note.subject, "Notification stored");
        Ok(MessageId::from(row.id))
    }
}
