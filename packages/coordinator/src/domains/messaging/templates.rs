//! Canned subject/body text for claim lifecycle notifications.

use chrono::{DateTime, Utc};

/// "Monday, August 31 at 9:30 AM" style rendering of a pickup time.
pub fn format_pickup_time(at: DateTime<Utc>) -> String {
    at.format("%A, %B %-d at %-I:%M %p").to_string()
}

/// Subject and body sent to a poster when another organization claims
/// units from their post.
pub fn claim_request(
    claiming_org: &str,
    item: &str,
    amount: u32,
    pickup: Option<DateTime<Utc>>,
) -> (String, String) {
    let subject = format!("Claim Request: {item} ({amount} units)");
    let when = match pickup {
        Some(at) => format!(" Pickup is scheduled for {}.", format_pickup_time(at)),
        None => String::new(),
    };
    let body = format!(
        "{claiming_org} has claimed {amount} units of {item}.{when} \
         Please confirm or cancel this claim from your dashboard."
    );
    (subject, body)
}

/// Sent to the claiming organization when the poster cancels their claim.
pub fn claim_cancelled(org: &str, item: &str) -> (String, String) {
    let subject = format!("Claim Cancelled: {item}");
    let body = format!(
        "{org} has cancelled your claim on {item}. \
         The claimed units are now available again."
    );
    (subject, body)
}
