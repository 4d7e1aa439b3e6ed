//! Supply posts: surplus/need listings and the supply feed.

pub mod actions;
pub mod feed;
pub mod models;

pub use models::{PostStatus, PostType, SupplyPost};
