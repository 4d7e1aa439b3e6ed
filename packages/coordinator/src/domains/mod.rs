pub mod availability;
pub mod claims;
pub mod inventory;
pub mod messaging;
pub mod organizations;
pub mod posts;
