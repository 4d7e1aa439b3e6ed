//! Store-backed claim submission and resolution.
//!
//! Submission sequences two dependent writes: the claim row is inserted
//! first, then the post's claimed quantity is updated with a guard on the
//! value read beforehand. A guard conflict means another claim raced us;
//! we re-read and retry once, and on a second conflict the inserted claim
//! is cancelled and the race surfaced as [`ClaimError::ConflictingClaim`].

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime, Utc};
use rowstore::{require, Filter, Guard, RowStore, SortOrder, StoreError};
use serde_json::json;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

use crate::common::{ClaimId, OrgId, PostId, ProfileId};
use crate::domains::availability::{
    candidate_days, DEFAULT_HORIZON_DAYS, DEFAULT_SLOT_MINUTES,
};
use crate::domains::messaging::templates;
use crate::domains::messaging::{Notification, Notifier};
use crate::domains::organizations;
use crate::domains::posts::{self, SupplyPost};

use super::error::ClaimError;
use super::models::{Claim, ClaimStatus, ENTITY};
use super::reconciler::{self, Reconciled};

/// A claim request as it arrives from the claiming organization.
#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct SubmitClaim<'a> {
    pub post_id: PostId,
    pub claiming_org_id: OrgId,
    #[builder(default)]
    pub claimed_by: Option<ProfileId>,
    /// Requested quantity as typed by the user.
    pub quantity: &'a str,
    pub pickup_date: NaiveDate,
    pub pickup_slot: NaiveTime,
    /// "Today" for the pickup window; the date itself is never bookable.
    pub reference_date: NaiveDate,
}

/// What a successful submission produced.
#[derive(Debug, Clone)]
pub struct ClaimReceipt {
    pub claim: Claim,
    pub post: SupplyPost,
    /// False if the claim committed but the poster could not be notified.
    pub notification_sent: bool,
}

/// Submit a claim end to end: validate the quantity, check the pickup
/// slot against the poster's published hours, insert the claim, and
/// commit the quantity to the post with a guarded update.
pub async fn submit_claim(
    store: &dyn RowStore,
    notifier: &dyn Notifier,
    params: SubmitClaim<'_>,
) -> Result<ClaimReceipt, ClaimError> {
    let post_row = store
        .get(posts::models::ENTITY, params.post_id.into_uuid())
        .await?;
    let post = match post_row {
        Some(row) => SupplyPost::from_row(&row).map_err(ClaimError::Other)?,
        None => return Err(ClaimError::PostNotFound { id: params.post_id }),
    };

    let amount = reconciler::validate_quantity(params.quantity, post.available_quantity())?;

    let schedule = organizations::actions::load_availability(store, post.organization_id)
        .await
        .map_err(ClaimError::Other)?
        .ok_or(ClaimError::ScheduleUnavailable {
            org_id: post.organization_id,
        })?;

    let day = candidate_days(
        &schedule,
        params.reference_date,
        DEFAULT_HORIZON_DAYS,
        DEFAULT_SLOT_MINUTES,
    )
    .find(|day| day.date == params.pickup_date);
    let bookable = day.map_or(false, |day| day.offers(params.pickup_slot));
    if !bookable {
        return Err(ClaimError::ClosedDay {
            date: params.pickup_date,
        });
    }
    let pickup_time = params.pickup_date.and_time(params.pickup_slot).and_utc();

    let claim_fields = json!({
        "post_id": params.post_id,
        "claiming_org_id": params.claiming_org_id,
        "claimed_by": params.claimed_by,
        "quantity_claimed": amount,
        "pickup_time": pickup_time,
        "status": ClaimStatus::Pending.to_string(),
        "created_at": Utc::now(),
    })
    .as_object()
    .cloned()
    .context("claim fields must serialize to an object")?;
    let claim_row = store.insert(ENTITY, claim_fields).await?;
    let claim = Claim::from_row(&claim_row).map_err(ClaimError::Other)?;

    let post = match commit_to_post(store, post, amount).await {
        Ok(post) => post,
        Err(err) => {
            abandon_claim(store, claim.id).await;
            return Err(err);
        }
    };

    let notification_sent =
        notify_claim_request(store, notifier, &params, &post, amount, pickup_time).await;

    info!(
        claim_id = %claim.id,
        post_id = %post.id,
        amount,
        "Claim submitted"
    );
    Ok(ClaimReceipt {
        claim,
        post,
        notification_sent,
    })
}

/// Apply the claimed amount to the post, guarded on the quantity we read.
/// One retry on conflict, as a racing claim may still have left room.
async fn commit_to_post(
    store: &dyn RowStore,
    mut post: SupplyPost,
    amount: u32,
) -> Result<SupplyPost, ClaimError> {
    for attempt in 0..2 {
        let reconciled = reconciler::apply_claim(&post, amount)?;
        let result = store
            .update(
                posts::models::ENTITY,
                post.id.into_uuid(),
                post_fields(reconciled),
                Guard::expect("quantity_claimed", post.quantity_claimed),
            )
            .await;
        match result {
            Ok(row) => return SupplyPost::from_row(&row).map_err(ClaimError::Other),
            Err(StoreError::Conflict) if attempt == 0 => {
                warn!(post_id = %post.id, "Concurrent claim detected, retrying");
                let row = require(store, posts::models::ENTITY, post.id.into_uuid()).await?;
                post = SupplyPost::from_row(&row).map_err(ClaimError::Other)?;
            }
            Err(StoreError::Conflict) => {
                return Err(ClaimError::ConflictingClaim { post_id: post.id })
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(ClaimError::ConflictingClaim { post_id: post.id })
}

fn post_fields(reconciled: Reconciled) -> rowstore::Fields {
    let mut fields = rowstore::Fields::new();
    fields.insert(
        "quantity_claimed".to_string(),
        json!(reconciled.quantity_claimed),
    );
    fields.insert("status".to_string(), json!(reconciled.status.to_string()));
    fields
}

/// Mark a just-inserted claim cancelled after its quantity commit failed.
/// Best effort: the claim row is already orphaned either way.
async fn abandon_claim(store: &dyn RowStore, id: ClaimId) {
    let mut fields = rowstore::Fields::new();
    fields.insert(
        "status".to_string(),
        json!(ClaimStatus::Cancelled.to_string()),
    );
    if let Err(err) = store
        .update(ENTITY, id.into_uuid(), fields, Guard::None)
        .await
    {
        warn!(claim_id = %id, error = %err, "Failed to cancel abandoned claim");
    }
}

async fn notify_claim_request(
    store: &dyn RowStore,
    notifier: &dyn Notifier,
    params: &SubmitClaim<'_>,
    post: &SupplyPost,
    amount: u32,
    pickup_time: chrono::DateTime<Utc>,
) -> bool {
    let claiming_org = match organizations::actions::fetch(store, params.claiming_org_id).await {
        Ok(org) => org,
        Err(err) => {
            warn!(error = %err, "Could not load claiming organization for notification");
            return false;
        }
    };
    let (subject, body) = templates::claim_request(
        &claiming_org.name,
        &post.item_name,
        amount,
        Some(pickup_time),
    );
    let result = notifier
        .send(Notification {
            sender_org_id: params.claiming_org_id,
            recipient_org_id: post.organization_id,
            subject: &subject,
            body: &body,
            related_post_id: Some(post.id),
        })
        .await;
    match result {
        Ok(_) => true,
        Err(err) => {
            warn!(post_id = %post.id, error = %err, "Claim committed but notification failed");
            false
        }
    }
}

/// How the posting organization resolves a pending or confirmed claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
    Confirm,
    Cancel,
    Complete,
}

impl ClaimDecision {
    fn target(self) -> ClaimStatus {
        match self {
            ClaimDecision::Confirm => ClaimStatus::Confirmed,
            ClaimDecision::Cancel => ClaimStatus::Cancelled,
            ClaimDecision::Complete => ClaimStatus::Completed,
        }
    }
}

/// Resolve a claim on behalf of the posting organization.
///
/// Cancelling returns the claimed units to the post and reopens it, then
/// notifies the claiming organization. Completing marks the post
/// completed outright, independent of its quantity totals.
pub async fn resolve_claim(
    store: &dyn RowStore,
    notifier: &dyn Notifier,
    claim_id: ClaimId,
    decision: ClaimDecision,
) -> Result<Claim, ClaimError> {
    let row = require(store, ENTITY, claim_id.into_uuid()).await?;
    let claim = Claim::from_row(&row).map_err(ClaimError::Other)?;

    let target = decision.target();
    if !claim.status.can_transition_to(target) {
        return Err(ClaimError::InvalidTransition {
            from: claim.status,
            to: target,
        });
    }

    // Guarded on the status we read, so two managers resolving the same
    // claim cannot both win.
    let mut fields = rowstore::Fields::new();
    fields.insert("status".to_string(), json!(target.to_string()));
    let row = store
        .update(
            ENTITY,
            claim_id.into_uuid(),
            fields,
            Guard::expect("status", claim.status.to_string()),
        )
        .await?;
    let claim = Claim::from_row(&row).map_err(ClaimError::Other)?;

    match decision {
        ClaimDecision::Confirm => {}
        ClaimDecision::Cancel => {
            release_claimed_units(store, &claim).await?;
            notify_cancellation(store, notifier, &claim).await;
        }
        ClaimDecision::Complete => {
            let mut fields = rowstore::Fields::new();
            fields.insert(
                "status".to_string(),
                json!(posts::PostStatus::Completed.to_string()),
            );
            store
                .update(
                    posts::models::ENTITY,
                    claim.post_id.into_uuid(),
                    fields,
                    Guard::None,
                )
                .await?;
        }
    }

    info!(claim_id = %claim.id, status = %claim.status, "Claim resolved");
    Ok(claim)
}

/// Return a cancelled claim's units to its post, guarded and retried
/// once like the forward path.
async fn release_claimed_units(store: &dyn RowStore, claim: &Claim) -> Result<(), ClaimError> {
    let row = require(store, posts::models::ENTITY, claim.post_id.into_uuid()).await?;
    let mut post = SupplyPost::from_row(&row).map_err(ClaimError::Other)?;

    for attempt in 0..2 {
        let reconciled = reconciler::cancel_claim(&post, claim);
        let result = store
            .update(
                posts::models::ENTITY,
                post.id.into_uuid(),
                post_fields(reconciled),
                Guard::expect("quantity_claimed", post.quantity_claimed),
            )
            .await;
        match result {
            Ok(_) => return Ok(()),
            Err(StoreError::Conflict) if attempt == 0 => {
                let row = require(store, posts::models::ENTITY, post.id.into_uuid()).await?;
                post = SupplyPost::from_row(&row).map_err(ClaimError::Other)?;
            }
            Err(StoreError::Conflict) => {
                return Err(ClaimError::ConflictingClaim { post_id: post.id })
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(ClaimError::ConflictingClaim { post_id: claim.post_id })
}

async fn notify_cancellation(store: &dyn RowStore, notifier: &dyn Notifier, claim: &Claim) {
    let post = match require(store, posts::models::ENTITY, claim.post_id.into_uuid()).await {
        Ok(row) => match SupplyPost::from_row(&row) {
            Ok(post) => post,
            Err(err) => {
                warn!(error = %err, "Could not parse post for cancellation notice");
                return;
            }
        },
        Err(err) => {
            warn!(error = %err, "Could not load post for cancellation notice");
            return;
        }
    };
    let poster = match organizations::actions::fetch(store, post.organization_id).await {
        Ok(org) => org,
        Err(err) => {
            warn!(error = %err, "Could not load poster organization for cancellation notice");
            return;
        }
    };
    let (subject, body) = templates::claim_cancelled(&poster.name, &post.item_name);
    let result = notifier
        .send(Notification {
            sender_org_id: post.organization_id,
            recipient_org_id: claim.claiming_org_id,
            subject: &subject,
            body: &body,
            related_post_id: Some(post.id),
        })
        .await;
    if let Err(err) = result {
        warn!(claim_id = %claim.id, error = %err, "Cancellation notice failed");
    }
}

/// A claiming organization's scheduled pickups, soonest first. Only open
/// claims with a pickup time appear.
pub async fn upcoming_pickups(store: &dyn RowStore, org_id: OrgId) -> Result<Vec<Claim>, ClaimError> {
    let rows = store
        .select(
            ENTITY,
            Filter::new()
                .eq("claiming_org_id", org_id.to_string())
                .order("pickup_time", SortOrder::Ascending),
        )
        .await?;
    let mut pickups = Vec::new();
    for row in &rows {
        let claim = Claim::from_row(row).map_err(ClaimError::Other)?;
        if claim.status.is_open() && claim.pickup_time.is_some() {
            pickups.push(claim);
        }
    }
    Ok(pickups)
}

/// All claims against one post, newest first.
pub async fn claims_for_post(store: &dyn RowStore, post_id: PostId) -> Result<Vec<Claim>, ClaimError> {
    let rows = store
        .select(
            ENTITY,
            Filter::new()
                .eq("post_id", post_id.to_string())
                .order("created_at", SortOrder::Descending),
        )
        .await?;
    rows.iter()
        .map(|row| Claim::from_row(row).map_err(ClaimError::Other))
        .collect()
}
