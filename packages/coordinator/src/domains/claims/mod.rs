//! Claims against supply posts: validation, reconciliation, lifecycle.
//!
//! A claim reserves units from another organization's post. The pure
//! reconciliation rules live in [`reconciler`]; [`actions`] drives them
//! against the store with guarded writes so concurrent claims cannot
//! oversubscribe a post.

pub mod actions;
pub mod error;
pub mod models;
pub mod reconciler;

pub use actions::{ClaimDecision, ClaimReceipt, SubmitClaim};
pub use error::ClaimError;
pub use models::{Claim, ClaimStatus};
