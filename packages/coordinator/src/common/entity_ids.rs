//! Typed ID definitions for all domain entities.
//!
//! One alias per entity. The marker types never hold data; they exist only
//! so the compiler keeps, say, a `ClaimId` out of a `PostId` parameter.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Organization entities.
pub struct Organization;

/// Marker type for Profile entities (users within an organization).
pub struct Profile;

/// Marker type for SupplyPost entities (surplus/need postings).
pub struct SupplyPost;

/// Marker type for Claim entities (pickup commitments against a post).
pub struct Claim;

/// Marker type for Message entities.
pub struct Message;

/// Marker type for InventoryItem entities.
pub struct InventoryItem;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Organization entities.
pub type OrgId = Id<Organization>;

/// Typed ID for Profile entities.
pub type ProfileId = Id<Profile>;

/// Typed ID for SupplyPost entities.
pub type PostId = Id<SupplyPost>;

/// Typed ID for Claim entities.
pub type ClaimId = Id<Claim>;

/// Typed ID for Message entities.
pub type MessageId = Id<Message>;

/// Typed ID for InventoryItem entities.
pub type ItemId = Id<InventoryItem>;
