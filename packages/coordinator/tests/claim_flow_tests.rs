//! End-to-end claim lifecycle tests against the in-memory store.

use chrono::{NaiveDate, NaiveTime};
use rowstore::testing::InMemoryStore;
use rowstore::{Filter, RowStore};

use coordinator_core::common::OrgId;
use coordinator_core::domains::availability::{DayHours, WeeklySchedule};
use coordinator_core::domains::claims::actions::{
    resolve_claim, submit_claim, upcoming_pickups,
};
use coordinator_core::domains::claims::{ClaimDecision, ClaimError, ClaimStatus, SubmitClaim};
use coordinator_core::domains::messaging::{self, Message, StoreNotifier};
use coordinator_core::domains::organizations::actions::{
    create_organization, save_availability, NewOrganization,
};
use coordinator_core::domains::posts::actions::create_post;
use coordinator_core::domains::posts::{actions::NewPost, PostStatus, PostType, SupplyPost};

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Monday reference date used throughout; Tuesday is the first bookable day.
fn monday() -> NaiveDate {
    date(2026, 3, 2)
}

async fn seeded_poster(store: &InMemoryStore) -> OrgId {
    let org = create_organization(
        store,
        &NewOrganization::builder().name("North Shelf").build(),
    )
    .await
    .unwrap();

    let mut schedule = WeeklySchedule::default();
    schedule.tuesday = DayHours::open(hm(9, 0), hm(17, 0));
    save_availability(store, org.id, &schedule).await.unwrap();
    org.id
}

async fn seeded_post(store: &InMemoryStore, org: OrgId, quantity: u32) -> SupplyPost {
    create_post(
        store,
        &NewPost::builder()
            .organization_id(org)
            .item_name("Canned Beans")
            .quantity(quantity)
            .post_type(PostType::Excess)
            .build(),
    )
    .await
    .unwrap()
}

fn submission<'a>(
    post: &SupplyPost,
    claimer: OrgId,
    quantity: &'a str,
) -> SubmitClaim<'a> {
    SubmitClaim::builder()
        .post_id(post.id)
        .claiming_org_id(claimer)
        .quantity(quantity)
        .pickup_date(date(2026, 3, 3))
        .pickup_slot(hm(9, 30))
        .reference_date(monday())
        .build()
}

#[tokio::test]
async fn submitting_a_claim_books_units_and_notifies_the_poster() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let poster = seeded_poster(&store).await;
    let post = seeded_post(&store, poster, 40).await;
    let claimer = create_organization(
        &store,
        &NewOrganization::builder().name("South Pantry").build(),
    )
    .await
    .unwrap();

    let receipt = submit_claim(&store, &notifier, submission(&post, claimer.id, "12"))
        .await
        .unwrap();

    assert_eq!(receipt.claim.status, ClaimStatus::Pending);
    assert_eq!(receipt.claim.quantity_claimed, 12);
    assert!(receipt.claim.pickup_time.is_some());
    assert_eq!(receipt.post.quantity_claimed, 12);
    assert_eq!(receipt.post.status, PostStatus::Active);
    assert!(receipt.notification_sent);

    let inbox = messaging::actions::fetch_for_org(&store, poster).await.unwrap();
    assert_eq!(inbox.len(), 1);
    let note: &Message = &inbox[0];
    assert_eq!(note.subject, "Claim Request: Canned Beans (12 units)");
    assert_eq!(note.related_post_id, Some(post.id));
    assert!(note.body.contains("South Pantry"));

    let pickups = upcoming_pickups(&store, claimer.id).await.unwrap();
    assert_eq!(pickups.len(), 1);
}

#[tokio::test]
async fn claiming_the_full_quantity_completes_the_post() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let poster = seeded_poster(&store).await;
    let post = seeded_post(&store, poster, 10).await;
    let claimer = OrgId::new();

    // No claiming-org row exists, so the notification is skipped but the
    // claim itself still commits.
    let receipt = submit_claim(&store, &notifier, submission(&post, claimer, "10"))
        .await
        .unwrap();
    assert_eq!(receipt.post.quantity_claimed, 10);
    assert_eq!(receipt.post.status, PostStatus::Completed);
    assert!(!receipt.notification_sent);
}

#[tokio::test]
async fn concurrent_claims_never_oversubscribe() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let poster = seeded_poster(&store).await;
    let post = seeded_post(&store, poster, 10).await;

    let (a, b) = tokio::join!(
        submit_claim(&store, &notifier, submission(&post, OrgId::new(), "6")),
        submit_claim(&store, &notifier, submission(&post, OrgId::new(), "6")),
    );

    // Exactly one of the two 6-unit claims can fit in 10.
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);

    let row = store
        .get("supply_posts", post.id.into_uuid())
        .await
        .unwrap()
        .unwrap();
    let post = SupplyPost::from_row(&row).unwrap();
    assert_eq!(post.quantity_claimed, 6);
    assert!(post.quantity_claimed <= post.quantity_numeric);
}

#[tokio::test]
async fn cancelling_a_claim_reopens_the_post_and_notifies_the_claimer() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let poster = seeded_poster(&store).await;
    let post = seeded_post(&store, poster, 5).await;
    let claimer = create_organization(
        &store,
        &NewOrganization::builder().name("South Pantry").build(),
    )
    .await
    .unwrap();

    let receipt = submit_claim(&store, &notifier, submission(&post, claimer.id, "5"))
        .await
        .unwrap();
    assert_eq!(receipt.post.status, PostStatus::Completed);

    let cancelled = resolve_claim(&store, &notifier, receipt.claim.id, ClaimDecision::Cancel)
        .await
        .unwrap();
    assert_eq!(cancelled.status, ClaimStatus::Cancelled);

    let row = store
        .get("supply_posts", post.id.into_uuid())
        .await
        .unwrap()
        .unwrap();
    let post = SupplyPost::from_row(&row).unwrap();
    assert_eq!(post.quantity_claimed, 0);
    assert_eq!(post.status, PostStatus::Active);

    let inbox = messaging::actions::fetch_for_org(&store, claimer.id)
        .await
        .unwrap();
    assert!(inbox
        .iter()
        .any(|m| m.subject == "Claim Cancelled: Canned Beans"));
}

#[tokio::test]
async fn completing_a_confirmed_claim_completes_the_post_regardless_of_quantity() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let poster = seeded_poster(&store).await;
    let post = seeded_post(&store, poster, 40).await;

    let receipt = submit_claim(&store, &notifier, submission(&post, OrgId::new(), "5"))
        .await
        .unwrap();

    let confirmed = resolve_claim(&store, &notifier, receipt.claim.id, ClaimDecision::Confirm)
        .await
        .unwrap();
    assert_eq!(confirmed.status, ClaimStatus::Confirmed);

    let completed = resolve_claim(&store, &notifier, receipt.claim.id, ClaimDecision::Complete)
        .await
        .unwrap();
    assert_eq!(completed.status, ClaimStatus::Completed);

    // 35 units remain unclaimed, but manual completion overrides.
    let row = store
        .get("supply_posts", post.id.into_uuid())
        .await
        .unwrap()
        .unwrap();
    let post = SupplyPost::from_row(&row).unwrap();
    assert_eq!(post.quantity_claimed, 5);
    assert_eq!(post.status, PostStatus::Completed);
}

#[tokio::test]
async fn terminal_claims_reject_further_decisions() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let poster = seeded_poster(&store).await;
    let post = seeded_post(&store, poster, 10).await;

    let receipt = submit_claim(&store, &notifier, submission(&post, OrgId::new(), "4"))
        .await
        .unwrap();
    resolve_claim(&store, &notifier, receipt.claim.id, ClaimDecision::Cancel)
        .await
        .unwrap();

    let err = resolve_claim(&store, &notifier, receipt.claim.id, ClaimDecision::Confirm)
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimError::InvalidTransition { .. }));
}

#[tokio::test]
async fn closed_day_and_off_grid_slots_are_rejected() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let poster = seeded_poster(&store).await;
    let post = seeded_post(&store, poster, 10).await;

    // Wednesday is closed in the seeded schedule.
    let params = SubmitClaim::builder()
        .post_id(post.id)
        .claiming_org_id(OrgId::new())
        .quantity("2")
        .pickup_date(date(2026, 3, 4))
        .pickup_slot(hm(9, 0))
        .reference_date(monday())
        .build();
    let err = submit_claim(&store, &notifier, params).await.unwrap_err();
    assert!(matches!(err, ClaimError::ClosedDay { .. }));

    // Tuesday is open, but 09:15 is not on the half-hour grid.
    let params = SubmitClaim::builder()
        .post_id(post.id)
        .claiming_org_id(OrgId::new())
        .quantity("2")
        .pickup_date(date(2026, 3, 3))
        .pickup_slot(hm(9, 15))
        .reference_date(monday())
        .build();
    let err = submit_claim(&store, &notifier, params).await.unwrap_err();
    assert!(matches!(err, ClaimError::ClosedDay { .. }));

    // Nothing was booked and no claim rows were left behind as pending.
    let rows = store.select("claims", Filter::new()).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn posts_without_published_hours_cannot_be_claimed() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let org = create_organization(
        &store,
        &NewOrganization::builder().name("No Hours Yet").build(),
    )
    .await
    .unwrap();
    let post = seeded_post(&store, org.id, 10).await;

    let err = submit_claim(&store, &notifier, submission(&post, OrgId::new(), "2"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimError::ScheduleUnavailable { .. }));
}

#[tokio::test]
async fn invalid_quantities_are_rejected_before_any_write() {
    let store = InMemoryStore::new();
    let notifier = StoreNotifier::new(&store);
    let poster = seeded_poster(&store).await;
    let post = seeded_post(&store, poster, 10).await;

    for bad in ["zero", "0", "-3", "11"] {
        let err = submit_claim(&store, &notifier, submission(&post, OrgId::new(), bad))
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimError::InvalidQuantity(_)), "input {bad}");
    }

    let rows = store.select("claims", Filter::new()).await.unwrap();
    assert!(rows.is_empty());
}
