//! Errors from the row store.
//!
//! The distinction between variants is load-bearing:
//! - [`StoreError::Conflict`] means a guarded update lost a race. Expected
//!   under concurrency; the caller re-reads and retries or rejects.
//! - [`StoreError::NotFound`] means the target row does not exist.
//! - [`StoreError::Backend`] means the platform call itself failed
//!   (network, auth, serialization). A system-level failure.
//!
//! Treating them the same breaks retry logic.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A guarded update found the row modified since it was read.
    ///
    /// Expected under concurrency. Retry with fresh state or reject.
    #[error("guard conflict: row was modified concurrently")]
    Conflict,

    /// The target row does not exist.
    #[error("{entity} row {id} not found")]
    NotFound { entity: String, id: Uuid },

    /// The backing platform call failed (network, auth, serialization).
    #[error("store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// True if the error is a guard conflict (retryable with fresh state).
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict)
    }
}
