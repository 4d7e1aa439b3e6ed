//! # Rowstore
//!
//! A thin client-side abstraction over a hosted row store (managed tables,
//! row-level security, realtime change feeds). The platform owns storage,
//! auth, and replication; this crate owns the *shape* of access:
//!
//! - [`Row`] / [`Fields`] — schemaless JSON rows keyed by UUID
//! - [`Filter`] — conjunctive equality filters plus an optional ordering
//! - [`Guard`] — conditional writes for optimistic concurrency
//! - [`Change`] — insert/update events from the realtime feed
//! - [`RowStore`] — the trait every backend implements
//!
//! ## The Guarded-Update Contract
//!
//! `update(entity, id, fields, Guard::Expect(prior))` succeeds only if the
//! stored row still carries every value in `prior`. Otherwise it fails with
//! [`StoreError::Conflict`] and writes nothing. This is how read-modify-write
//! sequences (read a counter, compute, write back) stay safe under
//! concurrency: the caller re-reads and retries, or surfaces the conflict.
//!
//! ## Change Feeds
//!
//! [`RowStore::subscribe`] yields insert and update events for rows matching
//! a filter. Deletes are not delivered; consumers that care about removal
//! watch a status column instead. Delivery is at-most-once per subscriber:
//! a slow consumer may miss events and should re-select to resynchronize.
//!
//! ## Testing
//!
//! The `testing` feature ships [`testing::InMemoryStore`], a complete
//! in-process implementation with atomic guard checks and working change
//! feeds, so domain logic is testable without any hosted backend.

mod error;
mod filter;
mod row;
mod store;

// Testing utilities (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use crate::error::StoreError;
pub use crate::filter::{Filter, SortOrder};
pub use crate::row::{Change, Fields, Guard, Row};
pub use crate::store::{require, ChangeFeed, RowStore};
