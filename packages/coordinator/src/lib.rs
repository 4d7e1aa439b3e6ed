// OFS Connect - Food Resource Network coordination core
//
// Connects food-relief organizations around surplus/need postings,
// inventory, messaging, and pickup scheduling. Persistence, auth, and
// realtime feeds are delegated to a hosted platform behind the `rowstore`
// trait; this crate owns the domain logic, most importantly the
// pickup-slot availability engine and the claim reconciler.

pub mod common;
pub mod config;
pub mod domains;
pub mod telemetry;

pub use config::*;
