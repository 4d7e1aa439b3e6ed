//! The `RowStore` trait: every persistence call the domain layer makes.

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::row::{Change, Fields, Guard, Row};

/// Receiving end of a realtime subscription.
///
/// Carries insert and update events for rows matching the subscribed
/// filter. Dropping the feed ends the subscription.
pub type ChangeFeed = mpsc::Receiver<Change>;

/// Client-side access to the hosted row store.
///
/// Entities are table names (`"supply_posts"`, `"claims"`, ...). Rows are
/// schemaless JSON; domain models own their own (de)serialization.
///
/// # Concurrency
///
/// The only cross-call guarantee implementations must provide is the
/// guarded update: with [`Guard::Expect`], the precondition check and the
/// write are atomic, and a failed check returns [`StoreError::Conflict`]
/// having written nothing.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Insert a new row and return it with its assigned id.
    async fn insert(&self, entity: &str, fields: Fields) -> Result<Row, StoreError>;

    /// Select all rows matching a filter, in the filter's order.
    async fn select(&self, entity: &str, filter: Filter) -> Result<Vec<Row>, StoreError>;

    /// Fetch a single row by id.
    async fn get(&self, entity: &str, id: Uuid) -> Result<Option<Row>, StoreError>;

    /// Update columns on a row, subject to a guard.
    ///
    /// Returns the updated row. Fails with [`StoreError::NotFound`] if the
    /// row does not exist and [`StoreError::Conflict`] if the guard no
    /// longer holds.
    async fn update(
        &self,
        entity: &str,
        id: Uuid,
        fields: Fields,
        guard: Guard,
    ) -> Result<Row, StoreError>;

    /// Delete a row by id. Deleting an absent row is not an error.
    async fn delete(&self, entity: &str, id: Uuid) -> Result<(), StoreError>;

    /// Subscribe to insert/update events for rows matching a filter.
    async fn subscribe(&self, entity: &str, filter: Filter) -> Result<ChangeFeed, StoreError>;
}

/// Fetch a row by id, turning absence into [`StoreError::NotFound`].
pub async fn require(store: &dyn RowStore, entity: &str, id: Uuid) -> Result<Row, StoreError> {
    store
        .get(entity, id)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            entity: entity.to_string(),
            id,
        })
}
