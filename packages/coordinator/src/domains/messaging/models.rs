use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rowstore::Row;
use serde::{Deserialize, Serialize};

use crate::common::{MessageId, OrgId, PostId};

/// Table name on the hosted platform.
pub const ENTITY: &str = "messages";

/// A message delivered to an organization's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_org_id: OrgId,
    pub recipient_org_id: OrgId,
    pub subject: String,
    pub body: String,
    /// The post this message is about, for claim notifications.
    #[serde(default)]
    pub related_post_id: Option<PostId>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn from_row(row: &Row) -> Result<Self> {
        serde_json::from_value(row.to_value()).context("Invalid messages row")
    }
}
