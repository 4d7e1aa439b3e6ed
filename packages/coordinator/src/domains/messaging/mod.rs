//! Organization-to-organization messaging and claim notifications.

pub mod actions;
pub mod models;
pub mod notifier;
pub mod templates;

pub use models::Message;
pub use notifier::{Notification, Notifier, StoreNotifier};
