use chrono::NaiveDate;
use rowstore::StoreError;
use thiserror::Error;

use crate::common::{OrgId, PostId};

use super::models::ClaimStatus;
use super::reconciler::InvalidQuantity;

/// Everything that can go wrong submitting or resolving a claim.
///
/// None of these are fatal: every operation either completes or leaves
/// prior state unchanged and reports why.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// The requested quantity was rejected; re-prompt the user.
    #[error(transparent)]
    InvalidQuantity(#[from] InvalidQuantity),

    /// The chosen pickup date has no bookable slots.
    #[error("no pickup slots are available on {date}")]
    ClosedDay { date: NaiveDate },

    /// The posting organization has not published pickup hours yet.
    #[error("organization {org_id} has not set its availability")]
    ScheduleUnavailable { org_id: OrgId },

    /// Another claim raced ours and won, twice. The post was re-read and
    /// the update retried once before giving up.
    #[error("post {post_id} was claimed concurrently; please retry")]
    ConflictingClaim { post_id: PostId },

    /// The claim's current status does not admit the requested change.
    #[error("cannot move a {from} claim to {to}")]
    InvalidTransition { from: ClaimStatus, to: ClaimStatus },

    #[error("post {id} not found")]
    PostNotFound { id: PostId },

    /// The persistence call itself failed; nothing was committed.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
