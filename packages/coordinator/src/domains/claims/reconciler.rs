//! Pure claim arithmetic: quantity validation, apply, and cancel.
//!
//! All quantity bookkeeping for posts happens here, as plain functions of
//! their inputs; [`actions`](super::actions) is responsible for writing
//! the results back atomically.

use thiserror::Error;

use crate::domains::posts::{PostStatus, SupplyPost};

use super::models::Claim;

/// Why a requested claim quantity was rejected. All three are input
/// errors the user can correct and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQuantity {
    #[error("\"{raw}\" is not a whole number")]
    NotANumber { raw: String },
    #[error("quantity must be greater than zero, got {value}")]
    NotPositive { value: i64 },
    #[error("requested {requested} units but only {available} are available")]
    ExceedsAvailable { requested: u32, available: u32 },
}

/// Parse and bound-check a requested quantity against what a post has
/// left. Returns the validated amount unchanged.
pub fn validate_quantity(raw: &str, available: u32) -> Result<u32, InvalidQuantity> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| InvalidQuantity::NotANumber {
            raw: raw.trim().to_string(),
        })?;
    if value <= 0 {
        return Err(InvalidQuantity::NotPositive { value });
    }
    let requested = u32::try_from(value).map_err(|_| InvalidQuantity::ExceedsAvailable {
        requested: u32::MAX,
        available,
    })?;
    if requested > available {
        return Err(InvalidQuantity::ExceedsAvailable {
            requested,
            available,
        });
    }
    Ok(requested)
}

/// The post-side outcome of applying or cancelling a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub quantity_claimed: u32,
    pub status: PostStatus,
}

/// Commit `amount` units against a post.
///
/// The post completes exactly when the new claimed total reaches its
/// full quantity; otherwise the status is unchanged.
pub fn apply_claim(post: &SupplyPost, amount: u32) -> Result<Reconciled, InvalidQuantity> {
    let available = post.available_quantity();
    if amount > available {
        return Err(InvalidQuantity::ExceedsAvailable {
            requested: amount,
            available,
        });
    }
    let quantity_claimed = post.quantity_claimed + amount;
    let status = if quantity_claimed >= post.quantity_numeric {
        PostStatus::Completed
    } else {
        post.status
    };
    Ok(Reconciled {
        quantity_claimed,
        status,
    })
}

/// Reverse a claim's units and reopen the post.
///
/// The post goes back to `active` unconditionally, even if other claims
/// are still attached. Cancelling with multiple open claims therefore
/// reopens the whole post; callers relying on single-claimant posts get
/// the intuitive behavior.
pub fn cancel_claim(post: &SupplyPost, claim: &Claim) -> Reconciled {
    Reconciled {
        quantity_claimed: post.quantity_claimed.saturating_sub(claim.quantity_claimed),
        status: PostStatus::Active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::common::{ClaimId, OrgId, PostId};
    use crate::domains::claims::models::ClaimStatus;
    use crate::domains::posts::PostType;

    fn post(total: u32, claimed: u32, status: PostStatus) -> SupplyPost {
        SupplyPost {
            id: PostId::new(),
            organization_id: OrgId::new(),
            posted_by: None,
            item_name: "Canned Beans".to_string(),
            quantity: format!("{total} units"),
            quantity_numeric: total,
            quantity_claimed: claimed,
            post_type: PostType::Excess,
            category: None,
            expiration_date: None,
            notes: None,
            status,
            created_at: Utc::now(),
        }
    }

    fn claim(post_id: PostId, amount: u32) -> Claim {
        Claim {
            id: ClaimId::new(),
            post_id,
            claiming_org_id: OrgId::new(),
            claimed_by: None,
            quantity_claimed: amount,
            pickup_time: None,
            status: ClaimStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn validation_distinguishes_the_three_failure_causes() {
        assert_eq!(
            validate_quantity("abc", 10),
            Err(InvalidQuantity::NotANumber {
                raw: "abc".to_string()
            })
        );
        assert_eq!(
            validate_quantity("0", 10),
            Err(InvalidQuantity::NotPositive { value: 0 })
        );
        assert_eq!(
            validate_quantity("-5", 10),
            Err(InvalidQuantity::NotPositive { value: -5 })
        );
        assert_eq!(
            validate_quantity("11", 10),
            Err(InvalidQuantity::ExceedsAvailable {
                requested: 11,
                available: 10
            })
        );
        assert_eq!(validate_quantity("10", 10), Ok(10));
        assert_eq!(validate_quantity(" 7 ", 10), Ok(7));
    }

    #[test]
    fn apply_adds_to_the_claimed_total() {
        let outcome = apply_claim(&post(40, 10, PostStatus::Active), 12).unwrap();
        assert_eq!(outcome.quantity_claimed, 22);
        assert_eq!(outcome.status, PostStatus::Active);
    }

    #[test]
    fn apply_completes_on_exhaustion() {
        let outcome = apply_claim(&post(10, 4, PostStatus::Active), 6).unwrap();
        assert_eq!(outcome.quantity_claimed, 10);
        assert_eq!(outcome.status, PostStatus::Completed);
    }

    #[test]
    fn apply_never_oversubscribes() {
        let p = post(10, 6, PostStatus::Active);
        assert_eq!(
            apply_claim(&p, 6),
            Err(InvalidQuantity::ExceedsAvailable {
                requested: 6,
                available: 4
            })
        );
    }

    #[test]
    fn cancel_reverses_quantity_and_reopens() {
        let p = post(10, 5, PostStatus::Completed);
        let c = claim(p.id, 5);
        let outcome = cancel_claim(&p, &c);
        assert_eq!(outcome.quantity_claimed, 0);
        assert_eq!(outcome.status, PostStatus::Active);
    }

    #[test]
    fn cancel_never_underflows() {
        let p = post(10, 3, PostStatus::Active);
        let c = claim(p.id, 5);
        assert_eq!(cancel_claim(&p, &c).quantity_claimed, 0);
    }
}
