//! Organizations, member profiles, and the availability they publish.

pub mod actions;
pub mod models;

pub use models::{Organization, Profile, Role};
