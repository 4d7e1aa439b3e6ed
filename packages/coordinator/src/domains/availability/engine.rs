//! Bookable pickup-slot enumeration over a rolling window.
//!
//! Given a weekly schedule and a reference date, [`candidate_days`] walks
//! the next `horizon_days` calendar days (today excluded) and computes each
//! day's bookable start times. Closed days are still emitted with
//! `is_open = false` so callers can render them as disabled choices.

use chrono::{Datelike, Days, NaiveDate, NaiveTime};

use super::schedule::{DayHours, Weekday, WeeklySchedule};

/// Days ahead offered for pickup scheduling.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Slot length in minutes.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// One calendar day in the pickup window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// Whether the organization is open at all that day. An open day can
    /// still have zero slots (degenerate hours).
    pub is_open: bool,
    /// Bookable start times, strictly increasing.
    pub slots: Vec<NaiveTime>,
}

impl CandidateDay {
    /// True if this day has at least one bookable slot.
    pub fn has_slots(&self) -> bool {
        !self.slots.is_empty()
    }

    /// True if `slot` is one of this day's bookable start times.
    pub fn offers(&self, slot: NaiveTime) -> bool {
        self.slots.binary_search(&slot).is_ok()
    }
}

/// Enumerate the pickup window: day offsets `1..=horizon_days` strictly
/// after `reference` (today is never bookable).
///
/// The iterator is lazy and can be restarted by calling again with the
/// same inputs; the output depends on nothing but the arguments.
pub fn candidate_days(
    schedule: &WeeklySchedule,
    reference: NaiveDate,
    horizon_days: u32,
    slot_minutes: u32,
) -> impl Iterator<Item = CandidateDay> + '_ {
    (1..=u64::from(horizon_days)).map(move |offset| {
        let date = reference
            .checked_add_days(Days::new(offset))
            .unwrap_or(NaiveDate::MAX);
        let weekday = Weekday::from(date.weekday());
        let hours = schedule.day(weekday);
        CandidateDay {
            date,
            weekday,
            is_open: hours.enabled,
            slots: day_slots(hours, slot_minutes),
        }
    })
}

/// Bookable start times for one day's hours.
///
/// Walks from `start` in `slot_minutes` steps while the slot's start time
/// is strictly before `end`; the comparison is on start time only. A
/// disabled day, `start >= end`, or a zero slot length all yield no slots.
pub fn day_slots(hours: &DayHours, slot_minutes: u32) -> Vec<NaiveTime> {
    if !hours.enabled || slot_minutes == 0 {
        return Vec::new();
    }

    let end = minute_of_day(hours.end);
    let mut slots = Vec::new();
    let mut at = minute_of_day(hours.start);
    while at < end {
        if let Some(time) = NaiveTime::from_hms_opt(at / 60, at % 60, 0) {
            slots.push(time);
        }
        at += slot_minutes;
    }
    slots
}

fn minute_of_day(time: NaiveTime) -> u32 {
    use chrono::Timelike;
    time.hour() * 60 + time.minute()
}
