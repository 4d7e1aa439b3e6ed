//! In-memory row store for testing.
//!
//! A complete [`RowStore`] backed by process memory: per-entity tables with
//! atomic guard checks, and working change feeds built on broadcast
//! channels. Domain flows (claim submission, feed updates) run against this
//! exactly as they would against the hosted platform.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::row::{Change, Fields, Guard, Row};
use crate::store::{ChangeFeed, RowStore};

const FEED_CAPACITY: usize = 64;

#[derive(Default)]
struct Table {
    rows: Vec<Row>,
}

/// In-memory store. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<DashMap<String, Table>>,
    feeds: Arc<DashMap<String, broadcast::Sender<Change>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn publish(&self, entity: &str, change: Change) {
        if let Some(sender) = self.feeds.get(entity) {
            // No subscribers is fine.
            let _ = sender.send(change);
        }
    }
}

#[async_trait]
impl RowStore for InMemoryStore {
    async fn insert(&self, entity: &str, fields: Fields) -> Result<Row, StoreError> {
        let row = Row::new(Uuid::now_v7(), fields);
        self.tables
            .entry(entity.to_string())
            .or_default()
            .rows
            .push(row.clone());
        self.publish(entity, Change::Inserted(row.clone()));
        Ok(row)
    }

    async fn select(&self, entity: &str, filter: Filter) -> Result<Vec<Row>, StoreError> {
        let mut matched: Vec<(Uuid, Fields)> = self
            .tables
            .get(entity)
            .map(|table| {
                table
                    .rows
                    .iter()
                    .filter(|row| filter.matches(&row.fields))
                    .map(|row| (row.id, row.fields.clone()))
                    .collect()
            })
            .unwrap_or_default();
        filter.sort_fields(&mut matched);
        Ok(matched
            .into_iter()
            .map(|(id, fields)| Row::new(id, fields))
            .collect())
    }

    async fn get(&self, entity: &str, id: Uuid) -> Result<Option<Row>, StoreError> {
        Ok(self
            .tables
            .get(entity)
            .and_then(|table| table.rows.iter().find(|row| row.id == id).cloned()))
    }

    async fn update(
        &self,
        entity: &str,
        id: Uuid,
        fields: Fields,
        guard: Guard,
    ) -> Result<Row, StoreError> {
        // The table entry is held for the whole check-then-write, so the
        // guard is atomic with the update.
        let mut table = self
            .tables
            .get_mut(entity)
            .ok_or_else(|| StoreError::NotFound {
                entity: entity.to_string(),
                id,
            })?;
        let row = table
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: entity.to_string(),
                id,
            })?;

        if !guard.holds_for(&row.fields) {
            return Err(StoreError::Conflict);
        }

        for (column, value) in fields {
            row.fields.insert(column, value);
        }
        let updated = row.clone();
        drop(table);

        self.publish(entity, Change::Updated(updated.clone()));
        Ok(updated)
    }

    async fn delete(&self, entity: &str, id: Uuid) -> Result<(), StoreError> {
        if let Some(mut table) = self.tables.get_mut(entity) {
            table.rows.retain(|row| row.id != id);
        }
        // Deletes are not published; the feed carries inserts and updates only.
        Ok(())
    }

    async fn subscribe(&self, entity: &str, filter: Filter) -> Result<ChangeFeed, StoreError> {
        let mut source = self
            .feeds
            .entry(entity.to_string())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0)
            .subscribe();
        let (tx, rx) = mpsc::channel(FEED_CAPACITY);

        tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(change) => {
                        if !filter.matches(&change.row().fields) {
                            continue;
                        }
                        if tx.send(change).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "change feed lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(rx)
    }
}
