//! Pickup availability: weekly open hours and bookable slot enumeration.
//!
//! The engine is pure. It reads a [`WeeklySchedule`] and a reference date
//! and enumerates the bookable days and times; nothing here touches the
//! store or the clock.

pub mod engine;
pub mod schedule;

pub use engine::{
    candidate_days, day_slots, CandidateDay, DEFAULT_HORIZON_DAYS, DEFAULT_SLOT_MINUTES,
};
pub use schedule::{DayHours, Weekday, WeeklySchedule};
